//! Recursive-descent parser for the type-expression grammar (`spec.md` §4.1):
//!
//! `T ::= id | *T | []T | map[T]T | chan T | func(T,...) | func(T,...) T | func(T,...) (T,...)`
//!
//! This operates purely on text and does not perform module/package
//! qualification — bare identifiers are interned as-is. The frontend's type
//! lowering (`cpg_frontend_go`) qualifies identifiers against the current
//! module and package before they ever reach this grammar, and constructs
//! `ObjectType`s directly via [`TypeRegistry`] rather than by formatting and
//! re-parsing text. This parser exists for: (a) the idempotence property
//! test, and (b) parsing textual FQNs handed in verbatim by a caller (the
//! "textual FQN" form of the type-expression contract in §4.1).

use crate::types::{is_builtin_type_name, PointerOrigin};
use crate::type_registry::TypeRegistry;
use crate::TypeIdx;

/// Parse failure: the input does not match the grammar at all (as opposed to
/// an unresolvable *identifier*, which still yields `UnknownType` per §4.1's
/// "Unresolvable yields UnknownType" rule and is not a parse failure).
#[derive(Debug, Eq, PartialEq)]
pub struct TypeParseError {
    pub position: usize,
    pub message: String,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, tok: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(tok) {
            self.pos += tok.len();
            true
        } else {
            false
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn parse_ident(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        let mut len = 0usize;
        for c in self.rest().chars() {
            if c.is_alphanumeric() || c == '_' || c == '.' || c == '/' {
                len += c.len_utf8();
            } else {
                break;
            }
        }
        if len == 0 {
            return Err(TypeParseError {
                position: self.pos,
                message: "expected identifier".to_string(),
            });
        }
        self.pos += len;
        Ok(&self.input[start..start + len])
    }

    fn parse_type(&mut self, reg: &mut TypeRegistry) -> Result<TypeIdx, TypeParseError> {
        self.skip_ws();
        if self.eat("*") {
            let inner = self.parse_type(reg)?;
            return Ok(reg.intern_pointer(inner, PointerOrigin::Pointer));
        }
        if self.eat("[]") {
            let inner = self.parse_type(reg)?;
            return Ok(reg.intern_pointer(inner, PointerOrigin::Array));
        }
        if self.rest().starts_with("map[") {
            self.pos += "map[".len();
            let key = self.parse_type(reg)?;
            if !self.eat("]") {
                return Err(self.err("expected ']' closing map key"));
            }
            let value = self.parse_type(reg)?;
            return Ok(reg.intern_object("map", vec![key, value]));
        }
        if self.rest().starts_with("chan") {
            self.pos += "chan".len();
            let elem = self.parse_type(reg)?;
            return Ok(reg.intern_object("chan", vec![elem]));
        }
        if self.rest().starts_with("func(") {
            self.pos += "func(".len();
            let params = self.parse_type_list(reg, ")")?;
            if !self.eat(")") {
                return Err(self.err("expected ')' closing func params"));
            }
            let returns = self.parse_return_types(reg)?;
            return Ok(reg.intern_function(params, returns));
        }
        let ident = self.parse_ident()?;
        if is_builtin_type_name(ident) {
            return Ok(reg.intern_object(ident, vec![]));
        }
        Ok(reg.intern_object(ident, vec![]))
    }

    fn parse_return_types(&mut self, reg: &mut TypeRegistry) -> Result<Vec<TypeIdx>, TypeParseError> {
        match self.peek() {
            None => Ok(vec![]),
            Some('(') => {
                self.eat("(");
                let list = self.parse_type_list(reg, ")")?;
                if !self.eat(")") {
                    return Err(self.err("expected ')' closing return list"));
                }
                Ok(list)
            }
            Some(_) => {
                let single = self.parse_type(reg)?;
                Ok(vec![single])
            }
        }
    }

    fn parse_type_list(&mut self, reg: &mut TypeRegistry, terminator: &str) -> Result<Vec<TypeIdx>, TypeParseError> {
        let mut out = Vec::new();
        self.skip_ws();
        if self.rest().starts_with(terminator) {
            return Ok(out);
        }
        loop {
            out.push(self.parse_type(reg)?);
            self.skip_ws();
            if self.eat(",") {
                continue;
            }
            break;
        }
        Ok(out)
    }

    fn err(&self, message: &str) -> TypeParseError {
        TypeParseError {
            position: self.pos,
            message: message.to_string(),
        }
    }
}

/// Parse a single type expression. Returns an error only when the input does
/// not conform to the grammar shape at all; unresolvable but well-formed
/// identifiers still succeed (the frontend decides whether to widen them to
/// `UnknownType`).
pub fn parse_type_text(input: &str, reg: &mut TypeRegistry) -> Result<TypeIdx, TypeParseError> {
    let mut parser = Parser::new(input);
    let ty = parser.parse_type(reg)?;
    parser.skip_ws();
    if !parser.rest().is_empty() {
        return Err(parser.err("trailing input after type expression"));
    }
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(s: &str) {
        let mut reg = TypeRegistry::new();
        let parsed = parse_type_text(s, &mut reg).unwrap_or_else(|e| panic!("failed to parse {s:?}: {e:?}"));
        let rendered = reg.display(parsed);
        let mut reg2 = TypeRegistry::new();
        let reparsed = parse_type_text(&rendered, &mut reg2).unwrap_or_else(|e| panic!("failed to reparse {rendered:?}: {e:?}"));
        let rendered_again = reg2.display(reparsed);
        assert_eq!(rendered, rendered_again, "idempotence failed for {s:?}");
    }

    #[test]
    fn parses_builtin() {
        roundtrip("int");
        roundtrip("string");
        roundtrip("error");
    }

    #[test]
    fn parses_pointer_and_array() {
        roundtrip("*int");
        roundtrip("[]string");
        roundtrip("*[]int");
        roundtrip("[]*int");
    }

    #[test]
    fn parses_map_and_chan() {
        roundtrip("map[string]int");
        roundtrip("chan int");
    }

    #[test]
    fn parses_func_types() {
        roundtrip("func()");
        roundtrip("func(int)");
        roundtrip("func(int, string) error");
        roundtrip("func(int) (int, error)");
    }

    #[test]
    fn parses_qualified_identifier() {
        roundtrip("pkg.Name");
        roundtrip("module/path/pkg.Name");
    }

    #[test]
    fn property_idempotence_over_grammar_sample() {
        let samples = [
            "int",
            "*p.MyStruct",
            "[]int",
            "map[string][]int",
            "chan *int",
            "func(int, *p.Foo) (int, error)",
            "func([]string) map[int]string",
        ];
        for s in samples {
            roundtrip(s);
        }
    }
}
