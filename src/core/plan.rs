//! Purpose: Static model declarations and the Type Descriptor Resolver.
//! Exports: `FieldDecl`, `Inherit`, `ModelDecl`, `Catalog`, `SelectFn`, `PreprocessFn`, `field`,
//!          `FieldDescriptor`, `FieldPlan`, `Registry`.
//! Role: Declarations name types by string; the registry resolves them lazily into cached plans.
//! Invariants: A plan is a pure function of the static declarations; racing computations agree.
//! Invariants: Attribute names and wire names are unique within one plan.
//! Invariants: The plan cache is append-only and lives as long as the registry.
use crate::core::context::ApiContext;
use crate::core::error::{Error, ErrorKind};
use crate::core::relation::{RelationDecl, RelationKind};
use crate::core::scalar::{EnumDecl, FlagsDecl};
use crate::core::select::Selection;
use crate::core::types::{Ty, TypeExpr};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Built-in name substituted with the native date-time representation.
pub const DATETIME: &str = "Datetime";
/// Built-in name for the open pagination cursor.
pub const CURSOR: &str = "Cursor";

const MAX_EXTENDS_DEPTH: usize = 16;

pub type SelectFn = fn(&Map<String, Value>, &ApiContext) -> Result<Selection, Error>;
/// Narrow legacy-format normalization applied to a private copy of the payload.
pub type PreprocessFn = fn(&mut Map<String, Value>);

/// Identifier a nested field reads from an embedding parent of `model`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Inherit {
    pub model: &'static str,
    pub attr: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDecl {
    pub attr: &'static str,
    pub wire: Option<&'static str>,
    pub ty: Ty,
    /// Parent identifier to read when this field is absent from the payload.
    pub inherit: Option<Inherit>,
}

pub const fn field(attr: &'static str, ty: Ty) -> FieldDecl {
    FieldDecl {
        attr,
        wire: None,
        ty,
        inherit: None,
    }
}

impl FieldDecl {
    pub const fn wire(self, wire: &'static str) -> Self {
        Self {
            wire: Some(wire),
            ..self
        }
    }

    pub const fn inherit_from(self, model: &'static str, attr: &'static str) -> Self {
        Self {
            inherit: Some(Inherit { model, attr }),
            ..self
        }
    }

    pub fn wire_name(&self) -> &'static str {
        self.wire.unwrap_or(self.attr)
    }
}

#[derive(Debug)]
pub struct ModelDecl {
    pub name: &'static str,
    pub extends: Option<&'static str>,
    pub fields: &'static [FieldDecl],
    pub relations: &'static [RelationDecl],
    pub select: Option<SelectFn>,
    pub preprocess: Option<PreprocessFn>,
    pub doc: &'static str,
}

impl ModelDecl {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            extends: None,
            fields: &[],
            relations: &[],
            select: None,
            preprocess: None,
            doc: "",
        }
    }

    pub const fn extends(self, parent: &'static str) -> Self {
        Self {
            extends: Some(parent),
            ..self
        }
    }

    pub const fn fields(self, fields: &'static [FieldDecl]) -> Self {
        Self { fields, ..self }
    }

    pub const fn relations(self, relations: &'static [RelationDecl]) -> Self {
        Self { relations, ..self }
    }

    pub const fn select(self, select: SelectFn) -> Self {
        Self {
            select: Some(select),
            ..self
        }
    }

    pub const fn preprocess(self, preprocess: PreprocessFn) -> Self {
        Self {
            preprocess: Some(preprocess),
            ..self
        }
    }

    pub const fn doc(self, doc: &'static str) -> Self {
        Self { doc, ..self }
    }
}

/// Everything a registry can resolve names against.
#[derive(Debug)]
pub struct Catalog {
    pub models: &'static [&'static ModelDecl],
    pub enums: &'static [&'static EnumDecl],
    pub flags: &'static [&'static FlagsDecl],
}

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub attr: &'static str,
    pub wire: &'static str,
    pub declared: Ty,
    pub ty: TypeExpr,
    pub required: bool,
    pub inherit: Option<Inherit>,
    /// Model in the inheritance chain that declared this attribute last.
    pub owner: &'static str,
}

#[derive(Debug)]
pub struct FieldPlan {
    model: &'static ModelDecl,
    lineage: Vec<&'static ModelDecl>,
    fields: Vec<FieldDescriptor>,
    by_attr: HashMap<&'static str, usize>,
    by_wire: HashMap<&'static str, usize>,
    relations: Vec<&'static RelationDecl>,
}

impl FieldPlan {
    pub fn model(&self) -> &'static ModelDecl {
        self.model
    }

    pub fn name(&self) -> &'static str {
        self.model.name
    }

    /// The model followed by its ancestors, nearest first.
    pub fn lineage(&self) -> &[&'static ModelDecl] {
        &self.lineage
    }

    pub fn is_a(&self, name: &str) -> bool {
        self.lineage.iter().any(|decl| decl.name == name)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn index_of(&self, attr: &str) -> Option<usize> {
        self.by_attr.get(attr).copied()
    }

    pub fn field(&self, attr: &str) -> Option<&FieldDescriptor> {
        self.index_of(attr).map(|idx| &self.fields[idx])
    }

    pub fn by_wire(&self, wire: &str) -> Option<&FieldDescriptor> {
        self.by_wire.get(wire).map(|idx| &self.fields[*idx])
    }

    pub fn relations(&self) -> &[&'static RelationDecl] {
        &self.relations
    }

    pub fn relation(&self, name: &str) -> Option<&'static RelationDecl> {
        self.relations
            .iter()
            .find(|relation| relation.name == name)
            .copied()
    }
}

/// Name index over a catalog plus the process-lifetime plan cache.
#[derive(Debug)]
pub struct Registry {
    catalog: &'static Catalog,
    models: HashMap<&'static str, &'static ModelDecl>,
    enums: HashMap<&'static str, &'static EnumDecl>,
    flags: HashMap<&'static str, &'static FlagsDecl>,
    plans: RwLock<HashMap<&'static str, Arc<FieldPlan>>>,
}

impl Registry {
    /// Indexes the catalog. Duplicate names keep the first declaration and are
    /// reported by [`Registry::check_all`].
    pub fn new(catalog: &'static Catalog) -> Self {
        let mut models = HashMap::new();
        for decl in catalog.models {
            models.entry(decl.name).or_insert(*decl);
        }
        let mut enums = HashMap::new();
        for decl in catalog.enums {
            enums.entry(decl.name).or_insert(*decl);
        }
        let mut flags = HashMap::new();
        for decl in catalog.flags {
            flags.entry(decl.name).or_insert(*decl);
        }
        Self {
            catalog,
            models,
            enums,
            flags,
            plans: RwLock::new(HashMap::new()),
        }
    }

    pub fn model(&self, name: &str) -> Result<&'static ModelDecl, Error> {
        self.models.get(name).copied().ok_or_else(|| {
            Error::new(ErrorKind::Resolution)
                .with_message(format!("no model named `{name}`"))
                .with_model(name)
        })
    }

    /// Declared models in catalog order.
    pub fn models(&self) -> impl Iterator<Item = &'static ModelDecl> + '_ {
        self.catalog.models.iter().copied()
    }

    pub fn resolve(&self, ty: &Ty) -> Result<TypeExpr, Error> {
        Ok(match ty {
            Ty::Int => TypeExpr::Int,
            Ty::Float => TypeExpr::Float,
            Ty::Str => TypeExpr::Str,
            Ty::Bool => TypeExpr::Bool,
            Ty::Any => TypeExpr::Any,
            Ty::Null => TypeExpr::Null,
            Ty::Named(name) => self.resolve_name(name)?,
            Ty::List(inner) => TypeExpr::List(Box::new(self.resolve(inner)?)),
            Ty::Optional(inner) => TypeExpr::Optional(Box::new(self.resolve(inner)?)),
            Ty::Map(inner) => TypeExpr::Map(Box::new(self.resolve(inner)?)),
            Ty::Union(candidates) => TypeExpr::Union(
                candidates
                    .iter()
                    .map(|candidate| self.resolve(candidate))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn resolve_name(&self, name: &str) -> Result<TypeExpr, Error> {
        if let Some(decl) = self.models.get(name).copied() {
            return Ok(TypeExpr::Model(decl));
        }
        if let Some(decl) = self.enums.get(name).copied() {
            return Ok(TypeExpr::Enum(decl));
        }
        if let Some(decl) = self.flags.get(name).copied() {
            return Ok(TypeExpr::Flags(decl));
        }
        match name {
            DATETIME => Ok(TypeExpr::DateTime),
            CURSOR => Ok(TypeExpr::Cursor),
            _ => Err(Error::new(ErrorKind::Resolution)
                .with_message(format!("type `{name}` is never declared"))
                .with_value(name)),
        }
    }

    pub fn plan_for(&self, name: &str) -> Result<Arc<FieldPlan>, Error> {
        let decl = self.model(name)?;
        self.plan(decl)
    }

    /// Returns the cached plan, computing it on first use.
    pub fn plan(&self, decl: &'static ModelDecl) -> Result<Arc<FieldPlan>, Error> {
        {
            let plans = self.plans.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(plan) = plans.get(decl.name) {
                return Ok(Arc::clone(plan));
            }
        }
        let computed = Arc::new(self.compute(decl)?);
        tracing::debug!(
            model = decl.name,
            fields = computed.fields.len(),
            "computed field plan"
        );
        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        let plan = plans.entry(decl.name).or_insert(computed);
        Ok(Arc::clone(plan))
    }

    fn lineage(&self, decl: &'static ModelDecl) -> Result<Vec<&'static ModelDecl>, Error> {
        let mut lineage = vec![decl];
        let mut current = decl;
        while let Some(parent) = current.extends {
            if lineage.len() > MAX_EXTENDS_DEPTH || lineage.iter().any(|seen| seen.name == parent)
            {
                return Err(Error::new(ErrorKind::Resolution)
                    .with_message("inheritance chain is cyclic or too deep")
                    .with_model(decl.name));
            }
            current = self.model(parent).map_err(|err| {
                err.with_message(format!("`{}` extends undeclared `{parent}`", current.name))
                    .with_model(decl.name)
            })?;
            lineage.push(current);
        }
        Ok(lineage)
    }

    fn compute(&self, decl: &'static ModelDecl) -> Result<FieldPlan, Error> {
        let lineage = self.lineage(decl)?;
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut by_attr: HashMap<&'static str, usize> = HashMap::new();
        let mut relations: Vec<&'static RelationDecl> = Vec::new();

        for ancestor in lineage.iter().rev() {
            let mut declared_here = HashSet::new();
            for field in ancestor.fields {
                if !declared_here.insert(field.attr) {
                    return Err(Error::new(ErrorKind::Resolution)
                        .with_message("attribute declared twice")
                        .with_model(ancestor.name)
                        .with_field(field.attr));
                }
                let ty = self.resolve(&field.ty).map_err(|err| {
                    err.with_model(ancestor.name).with_field(field.attr)
                })?;
                if let Some(source) = field.inherit {
                    self.model(source.model).map_err(|err| {
                        err.with_message(format!(
                            "inherited identifier names unknown model `{}`",
                            source.model
                        ))
                        .with_model(ancestor.name)
                        .with_field(field.attr)
                    })?;
                }
                let descriptor = FieldDescriptor {
                    attr: field.attr,
                    wire: field.wire_name(),
                    declared: field.ty,
                    required: !ty.is_optional(),
                    ty,
                    inherit: field.inherit,
                    owner: ancestor.name,
                };
                match by_attr.get(field.attr).copied() {
                    Some(idx) => fields[idx] = descriptor,
                    None => {
                        by_attr.insert(field.attr, fields.len());
                        fields.push(descriptor);
                    }
                }
            }
            for relation in ancestor.relations {
                match relations.iter().position(|known| known.name == relation.name) {
                    Some(idx) => relations[idx] = relation,
                    None => relations.push(relation),
                }
            }
        }

        let mut by_wire = HashMap::new();
        for (idx, descriptor) in fields.iter().enumerate() {
            if let Some(previous) = by_wire.insert(descriptor.wire, idx) {
                return Err(Error::new(ErrorKind::Resolution)
                    .with_message(format!(
                        "wire name `{}` bound by both `{}` and `{}`",
                        descriptor.wire, fields[previous].attr, descriptor.attr
                    ))
                    .with_model(decl.name)
                    .with_field(descriptor.attr));
            }
        }

        for relation in &relations {
            if let RelationKind::ForeignKey { key, embedded, .. } = relation.kind {
                let undeclared = [Some(key), embedded]
                    .into_iter()
                    .flatten()
                    .find(|attr| !by_attr.contains_key(attr));
                if let Some(attr) = undeclared {
                    return Err(Error::new(ErrorKind::Resolution)
                        .with_message(format!(
                            "relation `{}` refers to undeclared attribute `{attr}`",
                            relation.name
                        ))
                        .with_model(decl.name)
                        .with_field(attr));
                }
            }
        }

        Ok(FieldPlan {
            model: decl,
            lineage,
            fields,
            by_attr,
            by_wire,
            relations,
        })
    }

    /// Resolves every declared plan and checks catalog-wide name uniqueness.
    pub fn check_all(&self) -> Result<usize, Error> {
        let mut seen = HashSet::new();
        let names = self
            .catalog
            .models
            .iter()
            .map(|decl| decl.name)
            .chain(self.catalog.enums.iter().map(|decl| decl.name))
            .chain(self.catalog.flags.iter().map(|decl| decl.name));
        for name in names {
            if !seen.insert(name) || name == DATETIME || name == CURSOR {
                return Err(Error::new(ErrorKind::Resolution)
                    .with_message(format!(
                        "type name `{name}` is declared twice or shadows a built-in"
                    ))
                    .with_model(name));
            }
        }
        for decl in self.catalog.models {
            self.plan(decl)?;
        }
        Ok(self.catalog.models.len())
    }
}
