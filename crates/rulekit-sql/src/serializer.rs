//! Predicate tree to SQL WHERE text
//!
//! Serialization inverts [`crate::Compiler`]: the output parses back to a
//! predicate that evaluates the same on every context. Whitespace, keyword
//! case, `<>` versus `!=` and redundant parentheses are not preserved.

use crate::config::SqlDslConfig;
use crate::parser::Keyword;
use rulekit_core::{Operand, Operator, Predicate, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("Regular expression '{pattern}' has no LIKE equivalent")]
    UnsupportedPattern { pattern: String },

    #[error("Malformed {operator} predicate: {reason}")]
    MalformedPredicate { operator: Operator, reason: String },

    #[error("Value cannot be written as SQL: {reason}")]
    UnsupportedValue { reason: String },

    #[error("Predicate nested deeper than {max_depth} levels")]
    NestingTooDeep { max_depth: usize },
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// Renders predicates as SQL WHERE text
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    max_depth: usize,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(&SqlDslConfig::default())
    }
}

impl Serializer {
    pub fn new(config: &SqlDslConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    pub fn serialize(&self, predicate: &Predicate) -> SerializeResult<String> {
        self.write_predicate(predicate, 0)
    }

    fn write_predicate(&self, predicate: &Predicate, depth: usize) -> SerializeResult<String> {
        let depth = self.enter(depth)?;
        let operator = predicate.operator();

        match operator {
            Operator::EqualTo | Operator::NotEqualTo => {
                let [left, right] = binary(predicate)?;
                if is_null_constant(right) {
                    let test = if operator == Operator::EqualTo {
                        "IS NULL"
                    } else {
                        "IS NOT NULL"
                    };
                    return Ok(format!("{} {}", self.write_operand(left, depth)?, test));
                }
                let symbol = if operator == Operator::EqualTo { "=" } else { "!=" };
                self.write_comparison(left, symbol, right, depth)
            }

            Operator::GreaterThan => self.write_binary(predicate, ">", depth),
            Operator::GreaterThanOrEqualTo => self.write_binary(predicate, ">=", depth),
            Operator::LessThan => self.write_binary(predicate, "<", depth),
            Operator::LessThanOrEqualTo => self.write_binary(predicate, "<=", depth),

            Operator::In | Operator::NotIn => {
                let [subject, list] = binary(predicate)?;
                let values = match list {
                    Operand::Constant(Value::List(values)) if !values.is_empty() => values,
                    _ => {
                        return Err(malformed(operator, "second operand must be a non-empty list"))
                    }
                };
                let items = values
                    .iter()
                    .map(write_literal)
                    .collect::<SerializeResult<Vec<_>>>()?;
                let keyword = if operator == Operator::In { "IN" } else { "NOT IN" };
                Ok(format!(
                    "{} {} ({})",
                    self.write_operand(subject, depth)?,
                    keyword,
                    items.join(", ")
                ))
            }

            Operator::Between => match predicate.operands() {
                [subject, min, max] => Ok(format!(
                    "{} BETWEEN {} AND {}",
                    self.write_operand(subject, depth)?,
                    self.write_operand(min, depth)?,
                    self.write_operand(max, depth)?
                )),
                operands => Err(malformed(
                    operator,
                    &format!("expected 3 operands, got {}", operands.len()),
                )),
            },

            Operator::Matches | Operator::DoesNotMatch => {
                let [subject, pattern] = binary(predicate)?;
                let Operand::Pattern(pattern) = pattern else {
                    return Err(malformed(operator, "second operand must be a pattern"));
                };
                let like = regex_to_like(pattern.source()).ok_or_else(|| {
                    SerializeError::UnsupportedPattern {
                        pattern: pattern.source().to_string(),
                    }
                })?;
                let keyword = if operator == Operator::Matches { "LIKE" } else { "NOT LIKE" };
                Ok(format!(
                    "{} {} {}",
                    self.write_operand(subject, depth)?,
                    keyword,
                    quote(&like)
                ))
            }

            Operator::LogicalAnd | Operator::LogicalOr => {
                if predicate.operands().is_empty() {
                    return Err(malformed(operator, "at least one operand is required"));
                }
                // The opposite connective must be grouped to keep its extent
                let (joiner, grouped) = if operator == Operator::LogicalAnd {
                    (" AND ", Operator::LogicalOr)
                } else {
                    (" OR ", Operator::LogicalAnd)
                };

                let parts = predicate
                    .operands()
                    .iter()
                    .map(|operand| {
                        let inner = logical_operand(operator, operand)?;
                        let text = self.write_predicate(inner, depth)?;
                        Ok(if inner.operator() == grouped {
                            format!("({})", text)
                        } else {
                            text
                        })
                    })
                    .collect::<SerializeResult<Vec<_>>>()?;
                Ok(parts.join(joiner))
            }

            Operator::LogicalNot => {
                let [operand] = predicate.operands() else {
                    return Err(malformed(operator, "expected exactly 1 operand"));
                };
                let inner = logical_operand(operator, operand)?;

                if inner.operator() == Operator::EqualTo {
                    if let [left, right] = inner.operands() {
                        if is_null_constant(right) {
                            return Ok(format!("{} IS NOT NULL", self.write_operand(left, depth)?));
                        }
                    }
                }

                let text = self.write_predicate(inner, depth)?;
                if matches!(inner.operator(), Operator::LogicalAnd | Operator::LogicalOr) {
                    Ok(format!("NOT ({})", text))
                } else {
                    Ok(format!("NOT {}", text))
                }
            }
        }
    }

    fn write_binary(&self, predicate: &Predicate, symbol: &str, depth: usize) -> SerializeResult<String> {
        let [left, right] = binary(predicate)?;
        self.write_comparison(left, symbol, right, depth)
    }

    fn write_comparison(
        &self,
        left: &Operand,
        symbol: &str,
        right: &Operand,
        depth: usize,
    ) -> SerializeResult<String> {
        Ok(format!(
            "{} {} {}",
            self.write_operand(left, depth)?,
            symbol,
            self.write_operand(right, depth)?
        ))
    }

    fn write_operand(&self, operand: &Operand, depth: usize) -> SerializeResult<String> {
        match operand {
            Operand::Constant(value) => write_literal(value),
            Operand::Variable(var) => write_identifier(var.path()),
            Operand::Predicate(predicate) => {
                Ok(format!("({})", self.write_predicate(predicate, depth)?))
            }
            Operand::Pattern(pattern) => Err(SerializeError::UnsupportedValue {
                reason: format!("pattern '{}' used as a value", pattern.source()),
            }),
        }
    }

    fn enter(&self, depth: usize) -> SerializeResult<usize> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(SerializeError::NestingTooDeep {
                max_depth: self.max_depth,
            });
        }
        Ok(depth)
    }
}

fn binary(predicate: &Predicate) -> SerializeResult<[&Operand; 2]> {
    match predicate.operands() {
        [left, right] => Ok([left, right]),
        operands => Err(malformed(
            predicate.operator(),
            &format!("expected 2 operands, got {}", operands.len()),
        )),
    }
}

fn logical_operand(operator: Operator, operand: &Operand) -> SerializeResult<&Predicate> {
    operand
        .as_predicate()
        .ok_or_else(|| malformed(operator, "operands must be predicates"))
}

fn malformed(operator: Operator, reason: &str) -> SerializeError {
    SerializeError::MalformedPredicate {
        operator,
        reason: reason.to_string(),
    }
}

fn is_null_constant(operand: &Operand) -> bool {
    matches!(operand, Operand::Constant(Value::Null))
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn write_literal(value: &Value) -> SerializeResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Number(n) if n.is_finite() => {
            let text = n.to_string();
            // Keep the decimal point so the literal lexes back as a Number
            Ok(if text.contains('.') { text } else { format!("{}.0", text) })
        }
        Value::Number(n) => Err(SerializeError::UnsupportedValue {
            reason: format!("non-finite number {}", n),
        }),
        Value::Text(s) => Ok(quote(s)),
        Value::List(_) | Value::Map(_) => Err(SerializeError::UnsupportedValue {
            reason: format!("{} literal outside an IN list", value.type_name()),
        }),
    }
}

fn write_identifier(path: &str) -> SerializeResult<String> {
    let mut chars = path.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');

    if !valid_start || !valid_rest || Keyword::from_upper(&path.to_ascii_uppercase()).is_some() {
        return Err(SerializeError::UnsupportedValue {
            reason: format!("field path '{}' is not a valid identifier", path),
        });
    }
    Ok(path.to_string())
}

/// Invert [`crate::compiler::like_to_regex`]. Returns `None` for regular
/// expressions that use constructs LIKE cannot express.
pub fn regex_to_like(regex: &str) -> Option<String> {
    let chars: Vec<char> = regex.chars().collect();
    let body = chars.strip_prefix(&['^'])?;

    let mut like = String::with_capacity(body.len());
    let mut anchored = false;
    let mut i = 0;

    while i < body.len() {
        if anchored {
            return None;
        }

        match body[i] {
            '\\' => {
                let escaped = *body.get(i + 1)?;
                if escaped.is_ascii_alphanumeric() {
                    // Class escapes such as \d or \w
                    return None;
                }
                push_like_literal(&mut like, escaped);
                i += 2;
            }
            '.' if body.get(i + 1) == Some(&'*') => {
                like.push('%');
                i += 2;
            }
            '.' => {
                like.push('_');
                i += 1;
            }
            '$' => {
                anchored = true;
                i += 1;
            }
            '^' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' => return None,
            other => {
                push_like_literal(&mut like, other);
                i += 1;
            }
        }
    }

    anchored.then_some(like)
}

fn push_like_literal(like: &mut String, ch: char) {
    if ch == '%' || ch == '_' {
        like.push('\\');
    }
    like.push(ch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::like_to_regex;
    use rulekit_core::{Pattern, Variable};

    fn var(path: &str) -> Variable {
        Variable::new(path).unwrap()
    }

    fn serialize(predicate: &Predicate) -> String {
        Serializer::default().serialize(predicate).unwrap()
    }

    #[test]
    fn test_serialize_comparisons() {
        assert_eq!(serialize(&Predicate::equal_to(var("a"), Value::Int(1))), "a = 1");
        assert_eq!(serialize(&Predicate::not_equal_to(var("a"), Value::from("x"))), "a != 'x'");
        assert_eq!(serialize(&Predicate::greater_than(var("a"), Value::Int(-2))), "a > -2");
        assert_eq!(
            serialize(&Predicate::less_than_or_equal_to(var("user.age"), Value::Number(1.5))),
            "user.age <= 1.5"
        );
    }

    #[test]
    fn test_serialize_literals() {
        assert_eq!(write_literal(&Value::Null).unwrap(), "NULL");
        assert_eq!(write_literal(&Value::Bool(true)).unwrap(), "TRUE");
        assert_eq!(write_literal(&Value::Number(10.0)).unwrap(), "10.0");
        assert_eq!(write_literal(&Value::Number(99.99)).unwrap(), "99.99");
        assert_eq!(write_literal(&Value::from("O'Brien")).unwrap(), "'O''Brien'");
        assert!(write_literal(&Value::Number(f64::NAN)).is_err());
        assert!(write_literal(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_serialize_null_tests() {
        assert_eq!(serialize(&Predicate::equal_to(var("x"), Value::Null)), "x IS NULL");
        assert_eq!(serialize(&Predicate::not_equal_to(var("x"), Value::Null)), "x IS NOT NULL");
        assert_eq!(
            serialize(&Predicate::not(Predicate::equal_to(var("x"), Value::Null))),
            "x IS NOT NULL"
        );
    }

    #[test]
    fn test_serialize_membership_and_range() {
        let values = vec![Value::from("a"), Value::Int(2), Value::Null];
        assert_eq!(serialize(&Predicate::is_in(var("s"), values.clone())), "s IN ('a', 2, NULL)");
        assert_eq!(serialize(&Predicate::not_in(var("s"), values)), "s NOT IN ('a', 2, NULL)");
        assert_eq!(
            serialize(&Predicate::between(var("age"), Value::Int(18), Value::Int(65))),
            "age BETWEEN 18 AND 65"
        );
    }

    #[test]
    fn test_serialize_empty_in_list_is_malformed() {
        let err = Serializer::default()
            .serialize(&Predicate::is_in(var("s"), vec![]))
            .unwrap_err();
        assert!(matches!(err, SerializeError::MalformedPredicate { operator: Operator::In, .. }));
    }

    #[test]
    fn test_serialize_like() {
        let pattern = Pattern::new(like_to_regex("John%")).unwrap();
        assert_eq!(serialize(&Predicate::matches(var("name"), pattern.clone())), "name LIKE 'John%'");
        assert_eq!(
            serialize(&Predicate::does_not_match(var("name"), pattern)),
            "name NOT LIKE 'John%'"
        );
    }

    #[test]
    fn test_serialize_unsupported_pattern() {
        let pattern = Pattern::new(r"^\d+$").unwrap();
        let err = Serializer::default()
            .serialize(&Predicate::matches(var("code"), pattern))
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::UnsupportedPattern {
                pattern: r"^\d+$".to_string()
            }
        );
    }

    #[test]
    fn test_regex_to_like_inverts_like_to_regex() {
        for like in ["John%", "A_C", "%@example.com", r"100\%", r"a\_b", r"a\b", "(x)", "", "it's"] {
            let regex = like_to_regex(like);
            let back = regex_to_like(&regex).unwrap();
            assert_eq!(like_to_regex(&back), regex, "LIKE {:?} via {:?}", like, regex);
        }
    }

    #[test]
    fn test_regex_to_like_rejects() {
        assert_eq!(regex_to_like("John.*"), None);
        assert_eq!(regex_to_like("^John"), None);
        assert_eq!(regex_to_like("^a|b$"), None);
        assert_eq!(regex_to_like("^a+$"), None);
        assert_eq!(regex_to_like("^[ab]$"), None);
        assert_eq!(regex_to_like("^a$b$"), None);
        assert_eq!(regex_to_like(r"^a\"), None);
    }

    #[test]
    fn test_regex_to_like_literal_wildcards() {
        assert_eq!(regex_to_like("^50%$").as_deref(), Some(r"50\%"));
        assert_eq!(regex_to_like("^a_b$").as_deref(), Some(r"a\_b"));
        assert_eq!(regex_to_like(r"^a\.b$").as_deref(), Some("a.b"));
    }

    #[test]
    fn test_serialize_parenthesization() {
        let a = Predicate::equal_to(var("a"), Value::Int(1));
        let b = Predicate::equal_to(var("b"), Value::Int(2));
        let c = Predicate::equal_to(var("c"), Value::Int(3));

        let or_of_and = Predicate::or(vec![
            a.clone(),
            Predicate::and(vec![b.clone(), c.clone()]).unwrap(),
        ])
        .unwrap();
        assert_eq!(serialize(&or_of_and), "a = 1 OR (b = 2 AND c = 3)");

        let and_of_or = Predicate::and(vec![
            Predicate::or(vec![a.clone(), b.clone()]).unwrap(),
            c.clone(),
        ])
        .unwrap();
        assert_eq!(serialize(&and_of_or), "(a = 1 OR b = 2) AND c = 3");

        let not_and = Predicate::not(Predicate::and(vec![a.clone(), b.clone()]).unwrap());
        assert_eq!(serialize(&not_and), "NOT (a = 1 AND b = 2)");

        assert_eq!(serialize(&Predicate::not(a.clone())), "NOT a = 1");

        let nested_value = Predicate::equal_to(var("flag"), a);
        assert_eq!(serialize(&nested_value), "flag = (a = 1)");
    }

    #[test]
    fn test_serialize_rejects_bad_identifier() {
        let err = Serializer::default()
            .serialize(&Predicate::equal_to(var("null"), Value::Int(1)))
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnsupportedValue { .. }));

        let err = Serializer::default()
            .serialize(&Predicate::equal_to(var("first name"), Value::Int(1)))
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_serialize_pattern_as_value_is_rejected() {
        let pattern = Pattern::new("^a$").unwrap();
        let err = Serializer::default()
            .serialize(&Predicate::equal_to(var("a"), Operand::Pattern(pattern)))
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_serialize_nesting_limit() {
        let mut predicate = Predicate::equal_to(var("x"), Value::Int(1));
        for _ in 0..10 {
            predicate = Predicate::not(predicate);
        }

        let shallow = Serializer::new(&SqlDslConfig::default().with_max_depth(5));
        assert_eq!(
            shallow.serialize(&predicate),
            Err(SerializeError::NestingTooDeep { max_depth: 5 })
        );
        assert!(Serializer::default().serialize(&predicate).is_ok());
    }
}
