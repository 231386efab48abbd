//! Condition descriptor compilation.
//!
//! A condition descriptor is a loosely-typed [`Value`] tree. Classification
//! happens once at the compiler entry point, into one of:
//!
//! - **Literal**: a scalar, rendered as its SQL literal (`TRUE`, `1`, `'x'`).
//! - **Conjunction**: an array; elements compile independently and join with
//!   `AND`. An empty array compiles to the empty string (clause omitted).
//! - **Field reference**: `{":name": "field"}`, rendered as the quoted
//!   identifier.
//! - **Operator map**: a single-entry object keyed by an operator symbol,
//!   e.g. `{"=": [1, 1]}` or `{"IN": [{":name": "id"}, [1, 2]]}`.
//! - **Equality map**: any other object; each `field: value` entry renders
//!   `"field" = value` with entries joined by `AND`.
//!
//! Leaf values rendered under a field name are first offered to the
//! configured caster; a `Some` return is used verbatim as already-quoted SQL.

use serde_json::{Map, Value};

use crate::dialect::{CastContext, CasterFn, SchemaFn};
use crate::error::{SqlError, SqlResult};
use crate::quote::{Quoting, is_plain_identifier, quote_literal};

/// Context threaded through a compilation: quoting, hooks, and the field
/// name currently in scope (set while compiling an equality entry).
#[derive(Clone, Copy)]
pub(crate) struct ExprContext<'a> {
    pub(crate) quoting: Quoting,
    pub(crate) caster: Option<&'a CasterFn>,
    pub(crate) schema: Option<&'a SchemaFn>,
    pub(crate) name: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fixity {
    /// Binary-style operator: operands joined by the symbol, at least two.
    Infix,
    /// Variadic AND/OR: operands joined by the symbol, compounds parenthesized.
    Logical,
    /// Unary prefix operator with exactly one operand.
    Prefix,
    /// Membership test: target followed by a parenthesized comma list.
    List,
}

#[derive(Debug, Clone, Copy)]
struct OpSpec {
    symbol: &'static str,
    fixity: Fixity,
}

/// The operator table. Symbols match exactly; word operators match
/// case-insensitively and render uppercase.
fn operator_spec(key: &str) -> Option<OpSpec> {
    let spec = match key {
        "=" => OpSpec { symbol: "=", fixity: Fixity::Infix },
        "!=" => OpSpec { symbol: "!=", fixity: Fixity::Infix },
        "<>" => OpSpec { symbol: "<>", fixity: Fixity::Infix },
        "<" => OpSpec { symbol: "<", fixity: Fixity::Infix },
        ">" => OpSpec { symbol: ">", fixity: Fixity::Infix },
        "<=" => OpSpec { symbol: "<=", fixity: Fixity::Infix },
        ">=" => OpSpec { symbol: ">=", fixity: Fixity::Infix },
        _ => {
            let upper = key.to_ascii_uppercase();
            match upper.as_str() {
                "LIKE" => OpSpec { symbol: "LIKE", fixity: Fixity::Infix },
                "NOT LIKE" => OpSpec { symbol: "NOT LIKE", fixity: Fixity::Infix },
                "IS" => OpSpec { symbol: "IS", fixity: Fixity::Infix },
                "IS NOT" => OpSpec { symbol: "IS NOT", fixity: Fixity::Infix },
                "AND" => OpSpec { symbol: "AND", fixity: Fixity::Logical },
                "OR" => OpSpec { symbol: "OR", fixity: Fixity::Logical },
                "NOT" => OpSpec { symbol: "NOT", fixity: Fixity::Prefix },
                "IN" => OpSpec { symbol: "IN", fixity: Fixity::List },
                "NOT IN" => OpSpec { symbol: "NOT IN", fixity: Fixity::List },
                _ => return None,
            }
        }
    };
    Some(spec)
}

enum Node<'a> {
    Literal(&'a Value),
    FieldRef(&'a str),
    Conjunction(&'a [Value]),
    Operator { spec: OpSpec, operands: &'a Value },
    Equality(&'a Map<String, Value>),
}

fn classify(node: &Value) -> SqlResult<Node<'_>> {
    match node {
        Value::Array(items) => Ok(Node::Conjunction(items)),
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, operands)) = map.iter().next() {
                    if let Some(spec) = operator_spec(key) {
                        return Ok(Node::Operator { spec, operands });
                    }
                    if key == ":name" {
                        return match operands {
                            Value::String(name) => Ok(Node::FieldRef(name)),
                            _ => Err(SqlError::expression(
                                "`:name` expects a field name string",
                            )),
                        };
                    }
                    if !is_plain_identifier(key) {
                        return Err(SqlError::unknown_operator(key));
                    }
                }
            }
            Ok(Node::Equality(map))
        }
        scalar => Ok(Node::Literal(scalar)),
    }
}

/// A node whose rendering joins several terms with AND/OR and therefore
/// needs parentheses when embedded in a larger expression.
fn is_compound(node: &Value) -> bool {
    match node {
        Value::Array(items) => items.len() > 1,
        Value::Object(map) if map.len() == 1 => map
            .iter()
            .next()
            .and_then(|(key, _)| operator_spec(key))
            .is_some_and(|spec| spec.fixity == Fixity::Logical),
        // Multi-entry equality maps render as AND-joined terms
        Value::Object(map) => map.len() > 1,
        _ => false,
    }
}

/// Compile one descriptor into SQL text. An empty result means the
/// descriptor carries no condition and the clause must be omitted.
pub(crate) fn compile<'a>(node: &'a Value, cx: ExprContext<'a>) -> SqlResult<String> {
    match classify(node)? {
        Node::Literal(value) => render_value(value, cx.name, cx),
        Node::FieldRef(name) => Ok(cx.quoting.identifier(name)),
        Node::Conjunction(items) => compile_all(items, cx),
        Node::Operator { spec, operands } => compile_operator(spec, operands, None, cx),
        Node::Equality(map) => compile_equality(map, cx),
    }
}

/// Compile a sequence of descriptors under the implicit top-level AND.
/// Empty results are dropped; a single survivor is returned as-is; compound
/// members are parenthesized when joined.
pub(crate) fn compile_all<'a>(nodes: &'a [Value], cx: ExprContext<'a>) -> SqlResult<String> {
    let mut parts: Vec<(String, bool)> = Vec::new();
    for node in nodes {
        let text = compile(node, cx)?;
        if text.is_empty() {
            continue;
        }
        parts.push((text, is_compound(node)));
    }
    match parts.len() {
        0 => Ok(String::new()),
        1 => Ok(parts.swap_remove(0).0),
        _ => Ok(parts
            .into_iter()
            .map(|(text, compound)| if compound { format!("({text})") } else { text })
            .collect::<Vec<_>>()
            .join(" AND ")),
    }
}

/// Render a leaf value, offering it to the caster first when a field name
/// is in scope. A `Some` return from the caster is used verbatim.
pub(crate) fn render_value(
    value: &Value,
    name: Option<&str>,
    cx: ExprContext<'_>,
) -> SqlResult<String> {
    if let (Some(name), Some(caster)) = (name, cx.caster) {
        let states = CastContext::new(name, cx.schema);
        if let Some(text) = caster(value, &states) {
            return Ok(text);
        }
    }
    quote_literal(value)
}

fn compile_equality<'a>(map: &'a Map<String, Value>, cx: ExprContext<'a>) -> SqlResult<String> {
    let mut terms = Vec::with_capacity(map.len());
    for (field, value) in map {
        terms.push(compile_field(field, value, cx)?);
    }
    Ok(terms.join(" AND "))
}

fn compile_field<'a>(field: &'a str, value: &'a Value, cx: ExprContext<'a>) -> SqlResult<String> {
    match classify(value)? {
        // The field becomes the implicit left operand: {"age": {">": 21}}
        Node::Operator { spec, operands } => {
            let mut inner = cx;
            inner.name = Some(field);
            compile_operator(spec, operands, Some(field), inner)
        }
        Node::FieldRef(name) => Ok(format!(
            "{} = {}",
            cx.quoting.identifier(field),
            cx.quoting.identifier(name)
        )),
        Node::Literal(scalar) => Ok(format!(
            "{} = {}",
            cx.quoting.identifier(field),
            render_value(scalar, Some(field), cx)?
        )),
        Node::Conjunction(_) | Node::Equality(_) => Err(SqlError::expression(format!(
            "value for field `{field}` must be a scalar, a `:name` reference, or an operator map"
        ))),
    }
}

fn compile_operator<'a>(
    spec: OpSpec,
    operands: &'a Value,
    implicit: Option<&str>,
    cx: ExprContext<'a>,
) -> SqlResult<String> {
    let list: Vec<&'a Value> = match operands {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    match spec.fixity {
        Fixity::Infix => {
            let mut texts = Vec::with_capacity(list.len() + 1);
            if let Some(field) = implicit {
                texts.push(cx.quoting.identifier(field));
            }
            for operand in list {
                texts.push(non_empty_operand(spec, operand, cx)?);
            }
            if texts.len() < 2 {
                return Err(SqlError::expression(format!(
                    "operator `{}` expects at least two operands",
                    spec.symbol
                )));
            }
            Ok(texts.join(&format!(" {} ", spec.symbol)))
        }
        Fixity::Logical => {
            if implicit.is_some() {
                return Err(SqlError::expression(format!(
                    "operator `{}` cannot be applied to a field",
                    spec.symbol
                )));
            }
            let mut texts = Vec::with_capacity(list.len());
            for operand in list {
                let text = compile_operand(operand, cx)?;
                if !text.is_empty() {
                    texts.push(text);
                }
            }
            Ok(texts.join(&format!(" {} ", spec.symbol)))
        }
        Fixity::Prefix => {
            if implicit.is_some() {
                return Err(SqlError::expression(format!(
                    "operator `{}` cannot be applied to a field",
                    spec.symbol
                )));
            }
            match list.as_slice() {
                [operand] => {
                    let text = non_empty_operand(spec, operand, cx)?;
                    Ok(format!("{} {}", spec.symbol, text))
                }
                _ => Err(SqlError::expression(format!(
                    "operator `{}` expects exactly one operand",
                    spec.symbol
                ))),
            }
        }
        Fixity::List => {
            let mut rest = list.into_iter();
            let target = match implicit {
                Some(field) => cx.quoting.identifier(field),
                None => match rest.next() {
                    Some(operand) => non_empty_operand(spec, operand, cx)?,
                    None => {
                        return Err(SqlError::expression(format!(
                            "operator `{}` expects a target operand",
                            spec.symbol
                        )));
                    }
                },
            };
            let mut items = Vec::new();
            for operand in rest {
                match operand {
                    Value::Array(values) => {
                        for value in values {
                            items.push(non_empty_operand(spec, value, cx)?);
                        }
                    }
                    single => items.push(non_empty_operand(spec, single, cx)?),
                }
            }
            if items.is_empty() {
                // Degenerate membership test keeps boolean semantics:
                // IN () can match nothing, NOT IN () matches everything.
                return Ok(match spec.symbol {
                    "IN" => "1=0".to_string(),
                    _ => "1=1".to_string(),
                });
            }
            Ok(format!("{} {} ({})", target, spec.symbol, items.join(", ")))
        }
    }
}

fn non_empty_operand<'a>(
    spec: OpSpec,
    operand: &'a Value,
    cx: ExprContext<'a>,
) -> SqlResult<String> {
    let text = compile_operand(operand, cx)?;
    if text.is_empty() {
        return Err(SqlError::expression(format!(
            "operator `{}` received an empty operand",
            spec.symbol
        )));
    }
    Ok(text)
}

fn compile_operand<'a>(operand: &'a Value, cx: ExprContext<'a>) -> SqlResult<String> {
    if let Value::String(s) = operand {
        if s == ":name" {
            return match cx.name {
                Some(name) => Ok(cx.quoting.identifier(name)),
                None => Err(SqlError::expression(
                    "`:name` reference used without a field in scope",
                )),
            };
        }
    }
    let text = match classify(operand)? {
        Node::Literal(value) => return render_value(value, cx.name, cx),
        Node::FieldRef(name) => return Ok(cx.quoting.identifier(name)),
        Node::Conjunction(items) => compile_all(items, cx)?,
        Node::Operator { spec, operands } => compile_operator(spec, operands, None, cx)?,
        Node::Equality(map) => compile_equality(map, cx)?,
    };
    if !text.is_empty() && is_compound(operand) {
        return Ok(format!("({text})"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cx<'a>() -> ExprContext<'a> {
        ExprContext {
            quoting: Quoting::default(),
            caster: None,
            schema: None,
            name: None,
        }
    }

    #[test]
    fn literal_in_conjunction() {
        assert_eq!(compile(&json!([true]), cx()).unwrap(), "TRUE");
    }

    #[test]
    fn bare_scalar_literals() {
        assert_eq!(compile(&json!(false), cx()).unwrap(), "FALSE");
        assert_eq!(compile(&json!(7), cx()).unwrap(), "7");
        assert_eq!(compile(&json!("x"), cx()).unwrap(), "'x'");
    }

    #[test]
    fn equality_map_joins_with_and() {
        let node = json!({ "a": 1, "b": "x" });
        assert_eq!(compile(&node, cx()).unwrap(), r#""a" = 1 AND "b" = 'x'"#);
    }

    #[test]
    fn equality_with_null_value() {
        let node = json!({ "a": null });
        assert_eq!(compile(&node, cx()).unwrap(), r#""a" = NULL"#);
    }

    #[test]
    fn operator_equals() {
        assert_eq!(compile(&json!({ "=": [1, 1] }), cx()).unwrap(), "1 = 1");
    }

    #[test]
    fn operator_field_refs() {
        let node = json!({ "=": [{ ":name": "a" }, { ":name": "b" }] });
        assert_eq!(compile(&node, cx()).unwrap(), r#""a" = "b""#);
    }

    #[test]
    fn implicit_field_operand() {
        let node = json!({ "age": { ">": 21 } });
        assert_eq!(compile(&node, cx()).unwrap(), r#""age" > 21"#);
    }

    #[test]
    fn implicit_field_is_null() {
        let node = json!({ "deleted_at": { "IS": [null] } });
        assert_eq!(compile(&node, cx()).unwrap(), r#""deleted_at" IS NULL"#);
    }

    #[test]
    fn equality_field_reference_value() {
        let node = json!({ "a": { ":name": "b" } });
        assert_eq!(compile(&node, cx()).unwrap(), r#""a" = "b""#);
    }

    #[test]
    fn logical_nesting_parenthesizes_compounds() {
        let node = json!({
            "OR": [
                { "=": [1, 1] },
                { "AND": [{ "=": [2, 2] }, { "=": [3, 3] }] }
            ]
        });
        assert_eq!(
            compile(&node, cx()).unwrap(),
            "1 = 1 OR (2 = 2 AND 3 = 3)"
        );
    }

    #[test]
    fn not_prefix() {
        assert_eq!(compile(&json!({ "NOT": [true] }), cx()).unwrap(), "NOT TRUE");
        assert_eq!(
            compile(&json!({ "NOT": { "OR": [{ "=": [1, 1] }, { "=": [2, 2] }] } }), cx()).unwrap(),
            "NOT (1 = 1 OR 2 = 2)"
        );
    }

    #[test]
    fn not_parenthesizes_multi_entry_equality_map() {
        let node = json!({ "NOT": { "a": 1, "b": 2 } });
        assert_eq!(
            compile(&node, cx()).unwrap(),
            r#"NOT ("a" = 1 AND "b" = 2)"#
        );
    }

    #[test]
    fn in_list() {
        let node = json!({ "id": { "IN": [[1, 2, 3]] } });
        assert_eq!(compile(&node, cx()).unwrap(), r#""id" IN (1, 2, 3)"#);

        let node = json!({ "IN": [{ ":name": "id" }, [1, 2]] });
        assert_eq!(compile(&node, cx()).unwrap(), r#""id" IN (1, 2)"#);
    }

    #[test]
    fn in_scalar_operands() {
        let node = json!({ "id": { "IN": [1, 2, 3] } });
        assert_eq!(compile(&node, cx()).unwrap(), r#""id" IN (1, 2, 3)"#);
    }

    #[test]
    fn empty_in_list_semantics() {
        // Empty IN matches nothing, empty NOT IN matches everything.
        let node = json!({ "id": { "IN": [[]] } });
        assert_eq!(compile(&node, cx()).unwrap(), "1=0");

        let node = json!({ "id": { "NOT IN": [[]] } });
        assert_eq!(compile(&node, cx()).unwrap(), "1=1");
    }

    #[test]
    fn empty_descriptors_compile_to_nothing() {
        assert_eq!(compile(&json!([]), cx()).unwrap(), "");
        assert_eq!(compile(&json!({}), cx()).unwrap(), "");
    }

    #[test]
    fn conjunction_parenthesizes_compound_members() {
        let node = json!([{ "OR": [{ "=": [1, 1] }, { "=": [2, 2] }] }, true]);
        assert_eq!(
            compile(&node, cx()).unwrap(),
            "(1 = 1 OR 2 = 2) AND TRUE"
        );
    }

    #[test]
    fn unknown_operator_fails() {
        let err = compile(&json!({ "~!": [1, 2] }), cx()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown operator `~!`");
    }

    #[test]
    fn infix_arity_is_checked() {
        let err = compile(&json!({ "<": [1] }), cx()).unwrap_err();
        assert!(err.to_string().contains("at least two operands"));
    }

    #[test]
    fn name_reference_needs_scope() {
        let err = compile(&json!({ "=": [":name", 1] }), cx()).unwrap_err();
        assert!(err.to_string().contains("without a field in scope"));
    }

    #[test]
    fn equality_rejects_composite_values() {
        let err = compile(&json!({ "a": [1, 2] }), cx()).unwrap_err();
        assert!(err.to_string().contains("must be a scalar"));
    }

    #[test]
    fn caster_replaces_named_leaves() {
        let caster: &CasterFn = &|value, states| {
            assert_eq!(states.name, "field");
            assert_eq!(value, &json!("value"));
            Some("'casted'".to_string())
        };
        let cx = ExprContext {
            quoting: Quoting::default(),
            caster: Some(caster),
            schema: None,
            name: None,
        };
        let node = json!({ "field": "value" });
        assert_eq!(compile(&node, cx).unwrap(), r#""field" = 'casted'"#);
    }

    #[test]
    fn caster_none_falls_back_to_quoting() {
        let caster: &CasterFn = &|_, _| None;
        let cx = ExprContext {
            quoting: Quoting::default(),
            caster: Some(caster),
            schema: None,
            name: None,
        };
        let node = json!({ "field": "value" });
        assert_eq!(compile(&node, cx).unwrap(), r#""field" = 'value'"#);
    }

    #[test]
    fn caster_does_not_see_unnamed_leaves() {
        let caster: &CasterFn = &|_, _| Some("'nope'".to_string());
        let cx = ExprContext {
            quoting: Quoting::default(),
            caster: Some(caster),
            schema: None,
            name: None,
        };
        assert_eq!(compile(&json!([true]), cx).unwrap(), "TRUE");
    }

    #[test]
    fn multiple_filters_compile_all() {
        let nodes = vec![json!({ "a": 1 }), json!({ "b": 2 })];
        assert_eq!(
            compile_all(&nodes, cx()).unwrap(),
            r#""a" = 1 AND "b" = 2"#
        );
    }
}
