//! Namespace members: declarations, pragmas and directives.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{
    Directive, DirectiveKind, EnumDecl, EnumMember, FieldDecl, FunctionDecl, GlobalDecl, Ident,
    ImportPath, Literal, LiteralKind, Member, Modifier, Namespace, Param, Pragma, Pragmas,
    StructDecl, TypeNode, VariantDecl,
};
use tern_ir::{Pos, TokenKind};

use crate::recovery::MEMBER_START;
use crate::{PResult, Parser};

/// Pragmas and modifier read ahead of the member they belong to. Each is
/// consumed by the next member.
#[derive(Default)]
struct Pending {
    pragmas: Option<(Pragmas, Pos)>,
    modifier: Option<(Modifier, Pos)>,
}

/// What a declaration receives from [`Pending`].
pub(crate) struct Attrs {
    pub modifier: Modifier,
    pub pragmas: Pragmas,
}

impl Parser<'_> {
    pub(crate) fn parse_namespace(&mut self) -> PResult<Namespace> {
        let mut namespace = Namespace::new();
        let mut pending = Pending::default();
        while !self.cursor.is_at_end() {
            match self.cursor.current_kind() {
                TokenKind::OpenBracket => {
                    let (pragmas, pos) = self.parse_pragmas()?;
                    match &mut pending.pragmas {
                        Some((existing, at)) => {
                            existing.entries.extend(pragmas.entries);
                            *at = at.merge(pos);
                        }
                        None => pending.pragmas = Some((pragmas, pos)),
                    }
                }
                TokenKind::KeyPub | TokenKind::KeyPriv => {
                    let token = self.cursor.advance();
                    pending.modifier = Some((modifier_of(token.kind), token.pos));
                }
                kind if MEMBER_START.contains(kind) => {
                    let member = self.parse_member(&mut pending)?;
                    namespace.members.push(member);
                }
                _ => {
                    let token = self.cursor.advance();
                    self.bag
                        .error(ErrorCode::E1003, token.pos, "token out of context");
                }
            }
        }
        self.report_stray(pending);
        Ok(namespace)
    }

    fn parse_member(&mut self, pending: &mut Pending) -> PResult<Member> {
        let pragmas = pending.pragmas.take();
        let modifier = pending.modifier.take();
        let kind = self.cursor.current_kind();
        if matches!(kind, TokenKind::KeyImport | TokenKind::KeyUse) {
            self.report_stray(Pending { pragmas, modifier });
            return self.parse_directive().map(Member::Directive);
        }
        let attrs = Attrs {
            modifier: modifier.map(|(m, _)| m).unwrap_or_default(),
            pragmas: pragmas.map(|(p, _)| p).unwrap_or_default(),
        };
        match kind {
            TokenKind::KeyFn => self.parse_function(attrs).map(Member::Function),
            TokenKind::KeyType => self.parse_type_decl(attrs),
            TokenKind::KeyEnum => self.parse_enum(attrs).map(Member::Enum),
            _ => self.parse_global(attrs).map(Member::Global),
        }
    }

    /// Attributes with no declaration to attach to.
    fn report_stray(&mut self, pending: Pending) {
        if let Some((_, pos)) = pending.pragmas {
            self.bag
                .error(ErrorCode::E1005, pos, "invalid pragmas for this member");
        }
        if let Some((_, pos)) = pending.modifier {
            self.bag
                .error(ErrorCode::E1006, pos, "invalid modifier for this member");
        }
    }

    /// `[name, name: literal, ...]`. A bare name gets the value `true`.
    fn parse_pragmas(&mut self) -> PResult<(Pragmas, Pos)> {
        let start = self.expect(TokenKind::OpenBracket)?;
        let entries = self.comma_list(TokenKind::CloseBracket, |p| {
            let name = p.expect_ident()?;
            let value = if p.cursor.eat(TokenKind::Colon) {
                p.parse_literal()?
            } else {
                Literal::boolean(true)
            };
            Ok(Pragma { name, value })
        })?;
        Ok((Pragmas { entries }, self.span_from(start)))
    }

    /// A constant, optionally negated: pragma values, enum values and
    /// parameter defaults.
    pub(crate) fn parse_literal(&mut self) -> PResult<Literal> {
        let negative = self.cursor.check(TokenKind::Minus)
            && matches!(
                self.cursor.peek_kind(),
                TokenKind::ConstantDigit | TokenKind::ConstantFloatDigit
            );
        if negative {
            self.cursor.advance();
        }
        let kind = match self.cursor.current_kind() {
            TokenKind::ConstantDigit => LiteralKind::Int,
            TokenKind::ConstantFloatDigit => LiteralKind::Float,
            TokenKind::ConstantString => LiteralKind::Str,
            TokenKind::ConstantChar => LiteralKind::Char,
            TokenKind::ConstantBoolean => LiteralKind::Bool,
            _ => {
                self.expected("constant")?;
                return Ok(Literal::new(LiteralKind::Int, "0"));
            }
        };
        let token = self.cursor.advance();
        let value = if negative {
            format!("-{}", token.value)
        } else {
            token.value.clone()
        };
        Ok(Literal::new(kind, value))
    }

    /// `<T, U>` after a declaration name; empty when absent.
    fn parse_generic_params(&mut self) -> PResult<Vec<Ident>> {
        if !self.cursor.eat(TokenKind::BooleanLess) {
            return Ok(Vec::new());
        }
        self.comma_list(TokenKind::BooleanGreater, |p| p.expect_ident())
    }

    /// `fn name<T>(params): Ret { body }`. Without a body the declaration
    /// is a prototype.
    pub(crate) fn parse_function(&mut self, attrs: Attrs) -> PResult<FunctionDecl> {
        let start = self.expect(TokenKind::KeyFn)?;
        let name = self.expect_ident()?;
        let generics = self.parse_generic_params()?;
        self.expect(TokenKind::OpenPar)?;
        let params = self.parse_params()?;
        let ret = if self.cursor.eat(TokenKind::Colon) {
            Some(self.parse_return_type()?)
        } else {
            None
        };
        let body = if self.cursor.check(TokenKind::OpenBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(FunctionDecl {
            name,
            generics,
            params,
            ret,
            body,
            modifier: attrs.modifier,
            pragmas: attrs.pragmas,
            pos: self.span_from(start),
        })
    }

    /// Parameters after `(`, through `)`. An untyped parameter takes the
    /// type of the next typed one: `fn f(a, b: i32)` gives both `i32`.
    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        let written = self.comma_list(TokenKind::ClosePar, |p| {
            let name = p.expect_ident()?;
            let ty = if p.cursor.eat(TokenKind::Colon) {
                Some(p.parse_type()?)
            } else {
                None
            };
            let default = if p.cursor.eat(TokenKind::Equal) {
                Some(p.parse_literal()?)
            } else {
                None
            };
            Ok((name, ty, default))
        })?;

        let mut inherited: Vec<Option<TypeNode>> = Vec::with_capacity(written.len());
        let mut next = None;
        for (_, ty, _) in written.iter().rev() {
            if ty.is_some() {
                next.clone_from(ty);
            }
            inherited.push(next.clone());
        }
        inherited.reverse();

        let mut params = Vec::with_capacity(written.len());
        for ((name, _, default), ty) in written.into_iter().zip(inherited) {
            let ty = ty.unwrap_or_else(|| {
                self.bag
                    .error(ErrorCode::E1004, name.pos, "unable to infer type");
                TypeNode::bad(name.pos)
            });
            params.push(Param { name, ty, default });
        }
        Ok(params)
    }

    /// `type Name = (A | B)` or `type Name<T> { fields and methods }`.
    fn parse_type_decl(&mut self, attrs: Attrs) -> PResult<Member> {
        let start = self.expect(TokenKind::KeyType)?;
        let name = self.expect_ident()?;
        if self.cursor.eat(TokenKind::Equal) {
            self.expect(TokenKind::OpenPar)?;
            let mut members = vec![self.parse_type()?];
            while self.cursor.eat(TokenKind::Pipe) {
                members.push(self.parse_type()?);
            }
            self.expect(TokenKind::ClosePar)?;
            return Ok(Member::Variant(VariantDecl {
                name,
                members,
                modifier: attrs.modifier,
                pragmas: attrs.pragmas,
                pos: self.span_from(start),
            }));
        }

        let generics = self.parse_generic_params()?;
        self.expect(TokenKind::OpenBrace)?;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.cursor.check(TokenKind::CloseBrace) {
            let modifier_pos = self.cursor.current_pos();
            let modifier = match self.cursor.current_kind() {
                kind @ (TokenKind::KeyPub | TokenKind::KeyPriv) => {
                    self.cursor.advance();
                    Some(modifier_of(kind))
                }
                _ => None,
            };
            match self.cursor.current_kind() {
                TokenKind::KeyFn => {
                    let attrs = Attrs {
                        modifier: modifier.unwrap_or_default(),
                        pragmas: Pragmas::default(),
                    };
                    methods.push(self.parse_function(attrs)?);
                }
                TokenKind::Identifier => {
                    let name = self.expect_ident()?;
                    self.expect(TokenKind::Colon)?;
                    let ty = self.parse_type()?;
                    self.cursor.eat(TokenKind::Comma);
                    fields.push(FieldDecl {
                        name,
                        ty,
                        modifier: modifier.unwrap_or_default(),
                    });
                }
                TokenKind::Eof => return Err(self.unexpected_eof()),
                TokenKind::CloseBrace => {
                    self.bag.error(
                        ErrorCode::E1006,
                        modifier_pos,
                        "invalid modifier for this member",
                    );
                }
                _ => {
                    let token = self.cursor.advance();
                    self.bag
                        .error(ErrorCode::E1003, token.pos, "token out of context");
                }
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(Member::Struct(StructDecl {
            name,
            generics,
            fields,
            methods,
            modifier: attrs.modifier,
            pragmas: attrs.pragmas,
            pos: self.span_from(start),
        }))
    }

    /// `enum Name(base) { A, B: 5 }`
    fn parse_enum(&mut self, attrs: Attrs) -> PResult<EnumDecl> {
        let start = self.expect(TokenKind::KeyEnum)?;
        let name = self.expect_ident()?;
        let base = if self.cursor.eat(TokenKind::OpenPar) {
            let base = self.parse_type()?;
            self.expect(TokenKind::ClosePar)?;
            Some(base)
        } else {
            None
        };
        self.expect(TokenKind::OpenBrace)?;
        let mut members = Vec::new();
        while !self.cursor.check(TokenKind::CloseBrace) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected_eof());
            }
            let name = self.expect_ident()?;
            let value = if self.cursor.eat(TokenKind::Colon) {
                Some(self.parse_literal()?)
            } else {
                None
            };
            self.cursor.eat(TokenKind::Comma);
            members.push(EnumMember { name, value });
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(EnumDecl {
            name,
            base,
            members,
            modifier: attrs.modifier,
            pragmas: attrs.pragmas,
            pos: self.span_from(start),
        })
    }

    fn parse_global(&mut self, attrs: Attrs) -> PResult<GlobalDecl> {
        let start = self.cursor.current_pos();
        let decl = self.parse_var_decl()?;
        Ok(GlobalDecl {
            decl,
            modifier: attrs.modifier,
            pragmas: attrs.pragmas,
            pos: self.span_from(start),
        })
    }

    /// `import "file"`, `import package` or `use alias = expr`.
    fn parse_directive(&mut self) -> PResult<Directive> {
        let keyword = self.cursor.advance();
        let kind = if keyword.kind == TokenKind::KeyImport {
            let path = match self.cursor.current_kind() {
                TokenKind::ConstantString => {
                    ImportPath::File(self.cursor.advance().value.clone())
                }
                TokenKind::Identifier => {
                    ImportPath::Package(self.cursor.advance().value.clone())
                }
                _ => {
                    self.expected("import path")?;
                    ImportPath::Package(String::new())
                }
            };
            DirectiveKind::Import(path)
        } else {
            let alias = self.expect_ident()?;
            self.expect(TokenKind::Equal)?;
            let target = self.parse_expr()?;
            DirectiveKind::Use { alias, target }
        };
        Ok(Directive {
            kind,
            pos: self.span_from(keyword.pos),
        })
    }
}

fn modifier_of(kind: TokenKind) -> Modifier {
    if kind == TokenKind::KeyPub {
        Modifier::Public
    } else {
        Modifier::Private
    }
}
