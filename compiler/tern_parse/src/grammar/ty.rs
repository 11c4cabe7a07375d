//! Type notation.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{PrimitiveType, TypeNode, TypeNodeKind};
use tern_ir::TokenKind;
use tern_stack::ensure_sufficient_stack;

use crate::{PResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> PResult<TypeNode> {
        self.parse_type_in(false)
    }

    /// A function return type, the one place `Err!T` is legal.
    pub(crate) fn parse_return_type(&mut self) -> PResult<TypeNode> {
        self.parse_type_in(true)
    }

    fn parse_type_in(&mut self, allow_error_union: bool) -> PResult<TypeNode> {
        let error = self.parse_type_atom()?;
        if !self.cursor.check_same_line(TokenKind::Negation) {
            return Ok(error);
        }
        let bang = self.cursor.advance().pos;
        let success = self.parse_type_atom()?;
        if !allow_error_union {
            self.bag.error(
                ErrorCode::E1007,
                bang,
                "error union type is only allowed as a function return type",
            );
        }
        let pos = error.pos.merge(success.pos);
        Ok(TypeNode::new(
            TypeNodeKind::EnumError {
                error: Box::new(error),
                success: Box::new(success),
            },
            pos,
        ))
    }

    fn parse_type_atom(&mut self) -> PResult<TypeNode> {
        ensure_sufficient_stack(|| {
            let token = self.cursor.current();
            let kind = match token.kind {
                TokenKind::Identifier => {
                    self.cursor.advance();
                    if let Some(primitive) = PrimitiveType::from_name(&token.value) {
                        TypeNodeKind::Primitive(primitive)
                    } else {
                        let args = if self.cursor.eat_same_line(TokenKind::BooleanLess) {
                            self.comma_list(TokenKind::BooleanGreater, |p| p.parse_type())?
                        } else {
                            Vec::new()
                        };
                        TypeNodeKind::Named {
                            name: token.value.clone(),
                            args,
                        }
                    }
                }
                TokenKind::Star => {
                    self.cursor.advance();
                    TypeNodeKind::Pointer(Box::new(self.parse_type_atom()?))
                }
                TokenKind::Ampersand => {
                    self.cursor.advance();
                    TypeNodeKind::Reference(Box::new(self.parse_type_atom()?))
                }
                TokenKind::QuestionMark => {
                    self.cursor.advance();
                    TypeNodeKind::Option(Box::new(self.parse_type_atom()?))
                }
                TokenKind::OpenBracket => {
                    self.cursor.advance();
                    let elem = self.parse_type()?;
                    self.expect(TokenKind::CloseBracket)?;
                    TypeNodeKind::Array(Box::new(elem))
                }
                TokenKind::OpenPar => {
                    self.cursor.advance();
                    TypeNodeKind::Tuple(self.comma_list(TokenKind::ClosePar, |p| p.parse_type())?)
                }
                _ => {
                    let pos = self.expected("type")?;
                    return Ok(TypeNode::bad(pos));
                }
            };
            Ok(TypeNode::new(kind, self.span_from(token.pos)))
        })
    }
}
