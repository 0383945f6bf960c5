use crate::{
    sema::{substitute_generics, Data, ExprModel, Sema, StructIns, TypeKind},
    token::Token,
};

/// One entry of a struct literal expression.
#[derive(Debug, Clone)]
pub enum StructLitEntry {
    /// Positional expression, bound to the field at its index.
    Expr { token: Token, data: Data },
    /// `field: expr` pair.
    Pair {
        field: Token,
        token: Token,
        data: Data,
    },
}

/// A struct field with its kind substituted for a concrete instance.
#[derive(Debug, Clone)]
pub struct FieldIns {
    pub ident: String,
    pub mutable: bool,
    pub kind: TypeKind,
}

/// Matched field value forwarded to emission.
#[derive(Debug, Clone)]
pub struct StructArg {
    pub field: String,
    pub model: ExprModel,
}

/// Checks the entries of a struct literal: positional before named,
/// duplicate and unknown fields, missing fields and reference-field
/// initialization rules.
pub struct StructLitChecker<'a> {
    s: &'a mut Sema,
    ins: &'a StructIns,
    error_token: Token,
    /// True when the literal is built through the `new` builtin.
    via_new: bool,
    pub args: Vec<StructArg>,
}

impl<'a> StructLitChecker<'a> {
    pub fn new(
        s: &'a mut Sema,
        ins: &'a StructIns,
        error_token: Token,
        via_new: bool,
    ) -> StructLitChecker<'a> {
        StructLitChecker {
            s,
            ins,
            error_token,
            via_new,
            args: Vec::new(),
        }
    }

    pub fn check(&mut self, entries: Vec<StructLitEntry>) {
        let fields = self.s.fields_of(self.ins);

        if self.via_new && self.s.struct_decl(self.ins.decl).has_ref_field() {
            let token = self.error_token.clone();
            self.s
                .push_err(&token, "ref_used_struct_used_at_new_fn", vec![]);
        }

        let mut filled = vec![false; fields.len()];
        let mut paired = false;
        let mut positional = 0usize;

        for entry in entries {
            match entry {
                StructLitEntry::Pair { field, token, data } => {
                    paired = true;
                    let Some(i) = fields.iter().position(|f| f.ident == field.lexeme) else {
                        self.s
                            .push_err(&field, "ident_not_exist", vec![field.lexeme.clone()]);
                        continue;
                    };
                    if filled[i] {
                        self.s
                            .push_err(&field, "already_has_expr", vec![field.lexeme.clone()]);
                        continue;
                    }
                    filled[i] = true;
                    self.push_match(&fields[i], &data, &token);
                }
                StructLitEntry::Expr { token, data } => {
                    if paired {
                        // Positional entries may not follow named pairs.
                        self.s.push_err(&token, "invalid_syntax", vec![]);
                        continue;
                    }
                    if positional >= fields.len() {
                        self.s.push_err(&token, "argument_overflow", vec![]);
                        positional += 1;
                        continue;
                    }
                    filled[positional] = true;
                    let field = fields[positional].clone();
                    self.push_match(&field, &data, &token);
                    positional += 1;
                }
            }
        }

        if !paired && positional < fields.len() {
            let idents = fields[positional..]
                .iter()
                .map(|f| f.ident.clone())
                .collect::<Vec<_>>()
                .join(", ");
            let token = self.error_token.clone();
            self.s.push_err(&token, "missing_expr_for", vec![idents]);
        }

        if paired {
            for (i, f) in fields.iter().enumerate() {
                if !filled[i] && matches!(f.kind, TypeKind::Ref(_)) {
                    let token = self.error_token.clone();
                    self.s.push_err(
                        &token,
                        "reference_field_not_initialized",
                        vec![f.ident.clone()],
                    );
                }
            }
        }
    }

    fn push_match(&mut self, field: &FieldIns, d: &Data, token: &Token) {
        self.args.push(StructArg {
            field: field.ident.clone(),
            model: d.model.clone(),
        });
        self.s.check_validity_for_init_expr(field.mutable, d, token);
        self.s.check_assign_type(&field.kind, d, token, false);
    }
}

impl Sema {
    /// Fields of a struct instance with the instance's generics
    /// substituted into each field kind.
    pub fn fields_of(&self, ins: &StructIns) -> Vec<FieldIns> {
        let decl = &self.structs[ins.decl];
        let bound: Vec<Option<TypeKind>> = ins.generics.iter().cloned().map(Some).collect();
        decl.fields
            .iter()
            .map(|f| {
                let mut kind = f.kind.clone().unwrap_or(TypeKind::Nil);
                substitute_generics(&mut kind, &decl.generics, &bound);
                FieldIns {
                    ident: f.ident.clone(),
                    mutable: f.mutable,
                    kind,
                }
            })
            .collect()
    }

    /// Check a struct literal and return the matched field models.
    pub fn check_struct_lit(
        &mut self,
        ins: &StructIns,
        entries: Vec<StructLitEntry>,
        error_token: &Token,
        via_new: bool,
    ) -> Vec<StructArg> {
        let mut slc = StructLitChecker::new(self, ins, error_token.clone(), via_new);
        slc.check(entries);
        std::mem::take(&mut slc.args)
    }
}
