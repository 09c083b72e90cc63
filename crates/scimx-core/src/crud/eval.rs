use crate::expr::{CompareOp, Filter, Literal};
use crate::prop::{Property, PropertyValue, ScalarValue};

/// Evaluate a value filter against one element of a multi-valued property
///
/// Evaluation is total: a missing operand, an unassigned operand, or a
/// type mismatch between operand and literal makes the predicate false
/// instead of failing. `null` literals never match.
pub(crate) fn matches(filter: &Filter, element: &Property) -> bool {
    match filter {
        Filter::And(left, right) => matches(left, element) && matches(right, element),
        Filter::Or(left, right) => matches(left, element) || matches(right, element),
        Filter::Not(inner) => !matches(inner, element),
        Filter::Present { path } => operand(element, path)
            .map(|property| !property.is_unassigned())
            .unwrap_or(false),
        Filter::Compare { path, op, literal } => operand(element, path)
            .map(|property| compare(property, *op, literal))
            .unwrap_or(false),
    }
}

fn operand<'a>(element: &'a Property, path: &[String]) -> Option<&'a Property> {
    let mut current = element;
    for name in path {
        current = current.sub(name)?;
    }
    Some(current)
}

fn compare(property: &Property, op: CompareOp, literal: &Literal) -> bool {
    match property.value() {
        PropertyValue::Scalar(scalar) => compare_scalar(property, scalar, op, literal),
        // a multi-valued operand matches when any element does
        PropertyValue::Multi(elements) => elements
            .iter()
            .any(|element| compare(element, op, literal)),
        _ => false,
    }
}

fn compare_scalar(
    property: &Property,
    scalar: &ScalarValue,
    op: CompareOp,
    literal: &Literal,
) -> bool {
    match (scalar, literal) {
        (ScalarValue::Str(value), Literal::Str(text))
        | (ScalarValue::Reference(value), Literal::Str(text))
        | (ScalarValue::Binary(value), Literal::Str(text)) => {
            string_compare(value, text, property.attribute().case_exact(), op)
        }
        (ScalarValue::DateTime(value), Literal::Str(text)) => date_time_compare(value, text, op),
        (ScalarValue::Int(value), Literal::Number(number)) => {
            number_compare(*value as f64, *number, op)
        }
        (ScalarValue::Dec(value), Literal::Number(number)) => number_compare(*value, *number, op),
        (ScalarValue::Bool(value), Literal::Bool(flag)) => match op {
            CompareOp::Eq => value == flag,
            CompareOp::Ne => value != flag,
            _ => false,
        },
        _ => false,
    }
}

fn string_compare(value: &str, literal: &str, case_exact: bool, op: CompareOp) -> bool {
    if case_exact {
        string_op(value, literal, op)
    } else {
        string_op(&value.to_lowercase(), &literal.to_lowercase(), op)
    }
}

fn string_op(value: &str, literal: &str, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => value == literal,
        CompareOp::Ne => value != literal,
        CompareOp::Co => value.contains(literal),
        CompareOp::Sw => value.starts_with(literal),
        CompareOp::Ew => value.ends_with(literal),
        CompareOp::Gt => value > literal,
        CompareOp::Ge => value >= literal,
        CompareOp::Lt => value < literal,
        CompareOp::Le => value <= literal,
    }
}

fn date_time_compare(value: &str, literal: &str, op: CompareOp) -> bool {
    let value = match chrono::DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    let literal = match chrono::DateTime::parse_from_rfc3339(literal) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    match op {
        CompareOp::Eq => value == literal,
        CompareOp::Ne => value != literal,
        CompareOp::Gt => value > literal,
        CompareOp::Ge => value >= literal,
        CompareOp::Lt => value < literal,
        CompareOp::Le => value <= literal,
        _ => false,
    }
}

fn number_compare(value: f64, literal: f64, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => value == literal,
        CompareOp::Ne => value != literal,
        CompareOp::Gt => value > literal,
        CompareOp::Ge => value >= literal,
        CompareOp::Lt => value < literal,
        CompareOp::Le => value <= literal,
        _ => false,
    }
}
