//! Purpose: Value Binder and the top-level bind entry points.
//! Exports: `BindContext`, `bind`, `bind_with_report`, `bind_value`, `bind_value_with_report`.
//! Role: Walks a field plan over a decoded payload, recursing into nested types and selectors.
//! Invariants: Binding is pure computation; the only shared state touched is the plan cache.
//! Invariants: A failure anywhere discards the whole top-level result; nothing partial escapes.
//! Invariants: Union candidates are tried in declared order; the first JSON-kind match wins.
//! Invariants: List binding preserves source order.
use crate::core::context::{ApiContext, Mode};
use crate::core::cursor::Cursor;
use crate::core::error::{Error, ErrorKind};
use crate::core::instance::{ClientHandle, Instance, ParentHandle};
use crate::core::plan::{FieldDescriptor, FieldPlan, ModelDecl, Registry};
use crate::core::scalar::{
    coerce_bool, coerce_datetime, coerce_enum, coerce_flags, coerce_float, coerce_int, coerce_str,
    mismatch,
};
use crate::core::select::Selection;
use crate::core::types::{JsonKind, Ty, TypeExpr};
use crate::core::validate::{DriftCode, DriftIssue, DriftReport};
use crate::core::value::Bound;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

const MAX_SELECT_DEPTH: usize = 8;

/// Everything a bind call consults besides the payload.
#[derive(Clone, Debug)]
pub struct BindContext<'r> {
    registry: &'r Registry,
    mode: Mode,
    api: ApiContext,
    client: ClientHandle,
}

impl<'r> BindContext<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            mode: Mode::default(),
            api: ApiContext::default(),
            client: ClientHandle::detached(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_api(mut self, api: ApiContext) -> Self {
        self.api = api;
        self
    }

    pub fn with_api_version(self, api_version: u32) -> Self {
        self.with_api(ApiContext::new(api_version))
    }

    /// Instances produced by this context resolve relations through `client`.
    pub fn with_client(mut self, client: ClientHandle) -> Self {
        self.client = client;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn api(&self) -> ApiContext {
        self.api
    }
}

/// Binds `payload` as the model named `model`, after polymorphic selection.
pub fn bind(payload: &Value, model: &str, ctx: &BindContext<'_>) -> Result<Instance, Error> {
    bind_with_report(payload, model, ctx).map(|(instance, _)| instance)
}

/// Like [`bind`], also returning the drift tolerated along the way.
pub fn bind_with_report(
    payload: &Value,
    model: &str,
    ctx: &BindContext<'_>,
) -> Result<(Instance, DriftReport), Error> {
    let decl = ctx.registry.model(model)?;
    let mut session = Session::new(ctx);
    let instance = session
        .bind_model(payload, decl, &ParentHandle::none())
        .map_err(|err| err.with_path(ROOT))?;
    tracing::trace!(model, selected = instance.model(), "bound payload");
    let report = DriftReport::clean(instance.model()).set_issues(session.drift);
    Ok((instance, report))
}

/// Binds `payload` against an arbitrary declared type, e.g. `list<Score>`.
pub fn bind_value(payload: &Value, ty: &Ty, ctx: &BindContext<'_>) -> Result<Bound, Error> {
    bind_value_with_report(payload, ty, ctx).map(|(bound, _)| bound)
}

pub fn bind_value_with_report(
    payload: &Value,
    ty: &Ty,
    ctx: &BindContext<'_>,
) -> Result<(Bound, DriftReport), Error> {
    let resolved = ctx.registry.resolve(ty)?;
    let mut session = Session::new(ctx);
    let bound = session.bind_value(payload, &resolved, &ParentHandle::none())?;
    let report = DriftReport::clean(ty.to_string()).set_issues(session.drift);
    Ok((bound, report))
}

const ROOT: &str = "$";

enum Segment {
    Key(&'static str),
    Entry(String),
    Index(usize),
}

struct Session<'c, 'r> {
    ctx: &'c BindContext<'r>,
    path: Vec<Segment>,
    drift: Vec<DriftIssue>,
}

fn push_key(out: &mut String, key: &str) {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if plain {
        out.push('.');
        out.push_str(key);
    } else {
        out.push_str(&format!("[{key:?}]"));
    }
}

fn annotate(err: Error, model: &str, attr: &str) -> Error {
    let err = if err.model().is_none() {
        err.with_model(model)
    } else {
        err
    };
    if err.field().is_none() {
        err.with_field(attr)
    } else {
        err
    }
}

impl<'c, 'r> Session<'c, 'r> {
    fn new(ctx: &'c BindContext<'r>) -> Self {
        Self {
            ctx,
            path: Vec::new(),
            drift: Vec::new(),
        }
    }

    fn path_string(&self) -> String {
        let mut out = String::from(ROOT);
        for segment in &self.path {
            match segment {
                Segment::Key(key) => push_key(&mut out, key),
                Segment::Entry(key) => push_key(&mut out, key),
                Segment::Index(idx) => out.push_str(&format!("[{idx}]")),
            }
        }
        out
    }

    fn child_path(&self, key: &str) -> String {
        let mut out = self.path_string();
        push_key(&mut out, key);
        out
    }

    fn record(&mut self, code: DriftCode, path: String, model: &str, detail: String) {
        self.drift.push(DriftIssue {
            code,
            path,
            model: model.to_string(),
            detail,
        });
    }

    fn bind_value(
        &mut self,
        raw: &Value,
        ty: &TypeExpr,
        parent: &ParentHandle,
    ) -> Result<Bound, Error> {
        self.bind_inner(raw, ty, parent)
            .map_err(|err| err.with_path(self.path_string()))
    }

    fn bind_inner(
        &mut self,
        raw: &Value,
        ty: &TypeExpr,
        parent: &ParentHandle,
    ) -> Result<Bound, Error> {
        match ty {
            TypeExpr::Int => coerce_int(raw).map(Bound::Int),
            TypeExpr::Float => coerce_float(raw).map(Bound::Float),
            TypeExpr::Str => coerce_str(raw).map(Bound::Str),
            TypeExpr::Bool => coerce_bool(raw).map(Bound::Bool),
            TypeExpr::Any => Ok(Bound::Raw(raw.clone())),
            TypeExpr::Null => match raw {
                Value::Null => Ok(Bound::Null),
                other => Err(mismatch("null", other)),
            },
            TypeExpr::DateTime => coerce_datetime(raw).map(Bound::DateTime),
            TypeExpr::Cursor => match raw {
                Value::Null => Ok(Bound::Null),
                Value::Object(map) => Ok(Bound::Cursor(Cursor::from_map(map))),
                other => Err(mismatch("cursor object", other)),
            },
            TypeExpr::Enum(decl) => {
                let decl = *decl;
                let value = coerce_enum(decl, raw, self.ctx.mode)?;
                if value.is_unknown() {
                    let path = self.path_string();
                    tracing::warn!(
                        enumeration = decl.name,
                        value = %value.raw(),
                        path = %path,
                        "synthesized unknown enum member"
                    );
                    self.record(
                        DriftCode::UnknownEnumValue,
                        path,
                        decl.name,
                        format!("{} is not a known member", value.raw()),
                    );
                }
                Ok(Bound::Enum(value))
            }
            TypeExpr::Flags(decl) => {
                let decl = *decl;
                let flags = coerce_flags(decl, raw, self.ctx.mode)?;
                if flags.unknown_bits() != 0 {
                    let path = self.path_string();
                    tracing::debug!(flags = decl.name, path = %path, "keeping unknown flag bits");
                    self.record(
                        DriftCode::UnknownFlagBits,
                        path,
                        decl.name,
                        format!("unknown bits {:#x}", flags.unknown_bits()),
                    );
                }
                Ok(Bound::Flags(flags))
            }
            TypeExpr::Model(decl) => self.bind_model(raw, *decl, parent).map(Bound::Model),
            TypeExpr::List(inner) => match raw {
                Value::Null => Ok(Bound::Null),
                Value::Array(items) => {
                    let mut bound = Vec::with_capacity(items.len());
                    for (idx, item) in items.iter().enumerate() {
                        self.path.push(Segment::Index(idx));
                        let result = self.bind_value(item, inner, parent);
                        self.path.pop();
                        bound.push(result?);
                    }
                    Ok(Bound::List(bound))
                }
                other => Err(mismatch("list", other)),
            },
            TypeExpr::Optional(inner) => match raw {
                Value::Null => Ok(Bound::Null),
                other => self.bind_inner(other, inner, parent),
            },
            TypeExpr::Union(candidates) => match candidates.iter().find(|c| c.accepts(raw)) {
                Some(candidate) => self.bind_inner(raw, candidate, parent),
                None => Err(Error::new(ErrorKind::TypeMismatch).with_message(format!(
                    "no candidate of {ty} accepts {}",
                    JsonKind::of(raw).as_str()
                ))),
            },
            TypeExpr::Map(inner) => match raw {
                Value::Object(map) => {
                    let mut bound = std::collections::BTreeMap::new();
                    for (key, item) in map {
                        self.path.push(Segment::Entry(key.clone()));
                        let result = self.bind_value(item, inner, parent);
                        self.path.pop();
                        bound.insert(key.clone(), result?);
                    }
                    Ok(Bound::Map(bound))
                }
                other => Err(mismatch("object", other)),
            },
        }
    }

    fn bind_model(
        &mut self,
        raw: &Value,
        declared: &'static ModelDecl,
        parent: &ParentHandle,
    ) -> Result<Instance, Error> {
        let Value::Object(map) = raw else {
            return Err(mismatch("object", raw).with_model(declared.name));
        };
        let (decl, overrides) = self.select(map, declared)?;
        let plan = self.ctx.registry.plan(decl)?;
        let overrides = self.resolve_overrides(&plan, overrides)?;
        let map = preprocess(map, &plan);
        self.check_unknown(&map, &plan)?;
        Instance::build(
            Arc::clone(&plan),
            self.ctx.client.clone(),
            parent.clone(),
            |handle| self.bind_fields(&map, &plan, &overrides, parent, handle),
        )
    }

    fn select(
        &self,
        map: &Map<String, Value>,
        declared: &'static ModelDecl,
    ) -> Result<(&'static ModelDecl, Vec<(&'static str, Ty)>), Error> {
        let mut current = declared;
        for _ in 0..MAX_SELECT_DEPTH {
            let Some(select) = current.select else {
                return Ok((current, Vec::new()));
            };
            let selection = select(map, &self.ctx.api).map_err(|err| {
                if err.model().is_none() {
                    err.with_model(current.name)
                } else {
                    err
                }
            })?;
            match selection {
                Selection::Keep => return Ok((current, Vec::new())),
                Selection::Overrides(overrides) => return Ok((current, overrides)),
                Selection::Subclass(name) => {
                    let next = self.ctx.registry.model(name)?;
                    tracing::trace!(from = current.name, to = name, "selected subclass");
                    current = next;
                }
            }
        }
        Err(Error::new(ErrorKind::Resolution)
            .with_message("subclass selection did not settle")
            .with_model(declared.name))
    }

    fn resolve_overrides(
        &self,
        plan: &FieldPlan,
        overrides: Vec<(&'static str, Ty)>,
    ) -> Result<Vec<(usize, TypeExpr)>, Error> {
        overrides
            .into_iter()
            .map(|(attr, ty)| {
                let idx = plan.index_of(attr).ok_or_else(|| {
                    Error::new(ErrorKind::Resolution)
                        .with_message("override names an undeclared attribute")
                        .with_model(plan.name())
                        .with_field(attr)
                })?;
                let resolved = self
                    .ctx
                    .registry
                    .resolve(&ty)
                    .map_err(|err| annotate(err, plan.name(), attr))?;
                Ok((idx, resolved))
            })
            .collect()
    }

    fn check_unknown(&mut self, map: &Map<String, Value>, plan: &FieldPlan) -> Result<(), Error> {
        for key in map.keys() {
            if plan.by_wire(key).is_some() {
                continue;
            }
            let path = self.child_path(key);
            if self.ctx.mode.is_strict() {
                return Err(Error::new(ErrorKind::UnknownField)
                    .with_message("payload key is not declared")
                    .with_model(plan.name())
                    .with_field(key.as_str())
                    .with_path(path));
            }
            tracing::debug!(model = plan.name(), path = %path, "ignoring unknown field");
            self.record(
                DriftCode::UnknownField,
                path,
                plan.name(),
                format!("`{key}` is not declared"),
            );
        }
        Ok(())
    }

    fn missing(&mut self, plan: &FieldPlan, descriptor: &FieldDescriptor) -> Result<(), Error> {
        let path = self.child_path(descriptor.wire);
        if self.ctx.mode.is_strict() {
            return Err(Error::new(ErrorKind::MissingField)
                .with_message("required key is absent")
                .with_model(plan.name())
                .with_field(descriptor.attr)
                .with_path(path));
        }
        tracing::debug!(model = plan.name(), path = %path, "required field absent");
        self.record(
            DriftCode::MissingField,
            path,
            plan.name(),
            format!("`{}` is required", descriptor.wire),
        );
        Ok(())
    }

    fn bind_fields(
        &mut self,
        map: &Map<String, Value>,
        plan: &FieldPlan,
        overrides: &[(usize, TypeExpr)],
        parent: &ParentHandle,
        handle: &ParentHandle,
    ) -> Result<Vec<Option<Bound>>, Error> {
        let mut values = Vec::with_capacity(plan.fields().len());
        for (idx, descriptor) in plan.fields().iter().enumerate() {
            let ty = overrides
                .iter()
                .find(|(slot, _)| *slot == idx)
                .map_or(&descriptor.ty, |(_, ty)| ty);
            let slot = match map.get(descriptor.wire) {
                Some(raw) => {
                    self.path.push(Segment::Key(descriptor.wire));
                    let result = self.bind_value(raw, ty, handle);
                    self.path.pop();
                    Some(result.map_err(|err| annotate(err, plan.name(), descriptor.attr))?)
                }
                None if ty.is_optional() => Some(Bound::Null),
                // read from the embedding parent at access time
                None if descriptor
                    .inherit
                    .is_some_and(|source| parent.is_a(source.model)) =>
                {
                    None
                }
                None => {
                    self.missing(plan, descriptor)?;
                    None
                }
            };
            values.push(slot);
        }
        Ok(values)
    }
}

/// Applies the lineage's legacy normalizations, root first, to a private copy.
fn preprocess<'m>(map: &'m Map<String, Value>, plan: &FieldPlan) -> Cow<'m, Map<String, Value>> {
    let hooks: Vec<_> = plan
        .lineage()
        .iter()
        .rev()
        .filter_map(|decl| decl.preprocess)
        .collect();
    if hooks.is_empty() {
        return Cow::Borrowed(map);
    }
    let mut owned = map.clone();
    for hook in hooks {
        hook(&mut owned);
    }
    Cow::Owned(owned)
}

#[cfg(test)]
mod tests {
    use super::{BindContext, bind, bind_value, bind_with_report};
    use crate::core::context::{ApiContext, Mode};
    use crate::core::error::{Error, ErrorKind};
    use crate::core::plan::{Catalog, ModelDecl, Registry, field};
    use crate::core::scalar::{EnumDecl, EnumMember, EnumRepr, legacy_bool};
    use crate::core::select::{Selection, VariantTable};
    use crate::core::types::Ty;
    use crate::core::validate::DriftCode;
    use crate::core::value::Bound;
    use serde_json::{Map, Value, json};
    use std::sync::OnceLock;

    static SHAPE: EnumDecl = EnumDecl {
        name: "Shape",
        repr: EnumRepr::Str,
        members: &[EnumMember::str("Circle", "circle"), EnumMember::str("Square", "square")],
    };

    static MATCH_INFO: ModelDecl = ModelDecl::new("MatchInfo").fields(&[
        field("slot", Ty::Int),
        field("pass_", Ty::Bool).wire("pass"),
    ]);

    static HOLDER: ModelDecl = ModelDecl::new("Holder").fields(&[
        field("id", Ty::Int),
        field("note", Ty::Optional(&Ty::Int)),
        field("value", Ty::Optional(&Ty::Union(&[Ty::Int, Ty::Str]))),
        field("shape", Ty::Optional(&Ty::Named("Shape"))),
        field("children", Ty::Optional(&Ty::List(&Ty::Named("Child")))),
        field("tags", Ty::Optional(&Ty::Map(&Ty::Int))),
    ]);

    static CHILD: ModelDecl = ModelDecl::new("Child").fields(&[
        field("id", Ty::Int),
        field("holder_id", Ty::Int).inherit_from("Holder", "id"),
        field("seen", Ty::Optional(&Ty::Named("Datetime"))),
    ]);

    static SHELF: ModelDecl = ModelDecl::new("Shelf").fields(&[
        field("id", Ty::Int),
        field("child", Ty::Optional(&Ty::Named("Child"))),
    ]);

    static EVENTS: VariantTable = VariantTable {
        model: "Happening",
        key: "type",
        variants: &[("achievement", "Achievement"), ("rank", "Ranked")],
    };

    fn select_happening(
        payload: &Map<String, Value>,
        _api: &ApiContext,
    ) -> Result<Selection, Error> {
        EVENTS.select(payload)
    }

    static HAPPENING: ModelDecl = ModelDecl::new("Happening")
        .fields(&[field("type", Ty::Str), field("id", Ty::Int)])
        .select(select_happening);
    static ACHIEVEMENT: ModelDecl = ModelDecl::new("Achievement")
        .extends("Happening")
        .fields(&[field("badge", Ty::Str)]);
    static RANKED: ModelDecl = ModelDecl::new("Ranked")
        .extends("Happening")
        .fields(&[field("rank", Ty::Int)]);

    fn normalize_flag(payload: &mut Map<String, Value>) {
        if let Some(value) = payload.get_mut("perfect") {
            legacy_bool(value);
        }
    }

    fn select_by_version(
        _payload: &Map<String, Value>,
        api: &ApiContext,
    ) -> Result<Selection, Error> {
        if api.api_version < 20220705 {
            return Ok(Selection::Subclass("OldPlay"));
        }
        Ok(Selection::Keep)
    }

    static PLAY: ModelDecl = ModelDecl::new("Play")
        .fields(&[field("perfect", Ty::Bool)])
        .select(select_by_version)
        .preprocess(normalize_flag);
    static OLD_PLAY: ModelDecl = ModelDecl::new("OldPlay")
        .fields(&[field("perfect", Ty::Bool), field("mode", Ty::Optional(&Ty::Str))])
        .preprocess(normalize_flag);

    static CATALOG: Catalog = Catalog {
        models: &[
            &MATCH_INFO,
            &HOLDER,
            &CHILD,
            &SHELF,
            &HAPPENING,
            &ACHIEVEMENT,
            &RANKED,
            &PLAY,
            &OLD_PLAY,
        ],
        enums: &[&SHAPE],
        flags: &[],
    };

    fn registry() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| Registry::new(&CATALOG))
    }

    fn strict() -> BindContext<'static> {
        BindContext::new(registry()).with_mode(Mode::Strict)
    }

    fn lenient() -> BindContext<'static> {
        BindContext::new(registry()).with_mode(Mode::Lenient)
    }

    #[test]
    fn catalog_resolves() {
        assert_eq!(registry().check_all().expect("check"), 9);
    }

    #[test]
    fn alias_binds_wire_name_only() {
        let info = bind(&json!({"slot": 1, "pass": true}), "MatchInfo", &strict()).expect("bind");
        assert_eq!(info.boolean("pass_").expect("pass_"), Some(true));

        let err = bind(&json!({"slot": 1, "pass_": true}), "MatchInfo", &strict())
            .expect_err("unaliased");
        assert_eq!(err.kind(), ErrorKind::UnknownField);
        assert_eq!(err.field(), Some("pass_"));
    }

    #[test]
    fn optional_absence_is_null_in_both_modes() {
        for ctx in [strict(), lenient()] {
            let holder = bind(&json!({"id": 1}), "Holder", &ctx).expect("bind");
            assert_eq!(holder.attr("note").expect("note"), &Bound::Null);
            assert_eq!(holder.int("note").expect("note"), None);
        }
    }

    #[test]
    fn missing_required_is_strict_error_and_lenient_absence() {
        let err = bind(&json!({}), "Holder", &strict()).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.path(), Some("$.id"));

        let (holder, report) = bind_with_report(&json!({}), "Holder", &lenient()).expect("bind");
        let absent = holder.attr("id").expect_err("absent");
        assert_eq!(absent.kind(), ErrorKind::AttributeMissing);
        assert_eq!(report.count(DriftCode::MissingField), 1);
    }

    #[test]
    fn unknown_fields_are_reported_leniently() {
        let (_, report) =
            bind_with_report(&json!({"id": 1, "new": 0}), "Holder", &lenient()).expect("bind");
        assert_eq!(report.count(DriftCode::UnknownField), 1);
        assert_eq!(report.issues[0].path, "$.new");
    }

    #[test]
    fn union_dispatches_on_kind_not_content() {
        let holder = bind(&json!({"id": 1, "value": "5"}), "Holder", &strict()).expect("bind");
        assert_eq!(holder.str("value").expect("value"), Some("5"));
        let holder = bind(&json!({"id": 1, "value": 5}), "Holder", &strict()).expect("bind");
        assert_eq!(holder.int("value").expect("value"), Some(5));
        let err = bind(&json!({"id": 1, "value": true}), "Holder", &strict()).expect_err("kind");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn list_order_and_element_paths() {
        let payload = json!({"id": 9, "children": [{"id": 1}, {"id": 2}, {"id": 3}]});
        let holder = bind(&payload, "Holder", &strict()).expect("bind");
        let ids: Vec<i64> = holder
            .list("children")
            .expect("children")
            .expect("present")
            .iter()
            .filter_map(|child| child.as_instance()?.int("id").ok()?)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let bad = json!({"id": 9, "children": [{"id": 1}, {"id": "two"}]});
        let err = bind(&bad, "Holder", &lenient()).expect_err("element");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path(), Some("$.children[1].id"));
        assert_eq!(err.model(), Some("Child"));
    }

    #[test]
    fn inherited_identifier_reads_parent() {
        let payload = json!({"id": 9, "children": [{"id": 1}]});
        let holder = bind(&payload, "Holder", &strict()).expect("bind");
        let children = holder.list("children").expect("children").expect("present");
        let child = children[0].as_instance().expect("child");
        assert!(!child.has("holder_id"));
        assert_eq!(child.int("holder_id").expect("inherited"), Some(9));
        assert_eq!(child.parent().expect("parent"), holder);
    }

    #[test]
    fn inherited_identifier_ignores_other_parents() {
        let payload = json!({"id": 4, "child": {"id": 1}});
        let err = bind(&payload, "Shelf", &strict()).expect_err("strict");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.path(), Some("$.child.holder_id"));

        let (shelf, report) = bind_with_report(&payload, "Shelf", &lenient()).expect("lenient");
        assert_eq!(report.count(DriftCode::MissingField), 1);
        let child = shelf.instance("child").expect("child").expect("non-null");
        let err = child.int("holder_id").expect_err("not a holder");
        assert_eq!(err.kind(), ErrorKind::AttributeMissing);

        let err = bind(&json!({"id": 1}), "Child", &strict()).expect_err("no parent");
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.path(), Some("$.holder_id"));
    }

    #[test]
    fn list_value_binds_top_level_sequences() {
        let bound = bind_value(
            &json!([{"id": 1}, {"id": 2}]),
            &Ty::List(&Ty::Named("Child")),
            &lenient(),
        )
        .expect("bind");
        assert_eq!(bound.as_list().map(<[Bound]>::len), Some(2));
        let null = bind_value(&json!(null), &Ty::List(&Ty::Int), &strict()).expect("null");
        assert!(null.is_null());
    }

    #[test]
    fn discriminant_selects_subclass() {
        let event = bind(
            &json!({"type": "achievement", "id": 1, "badge": "gold"}),
            "Happening",
            &strict(),
        )
        .expect("bind");
        assert_eq!(event.model(), "Achievement");
        assert!(event.is_a("Happening"));

        let err = bind(
            &json!({"type": "unknown_future_value", "id": 1}),
            "Happening",
            &lenient(),
        )
        .expect_err("unknown");
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
        assert_eq!(err.value(), Some("unknown_future_value"));
        assert_eq!(err.model(), Some("Happening"));
    }

    #[test]
    fn version_selection_and_legacy_normalization() {
        let modern = bind(&json!({"perfect": 1}), "Play", &strict()).expect("modern");
        assert_eq!(modern.model(), "Play");
        assert_eq!(modern.boolean("perfect").expect("perfect"), Some(true));

        let old_ctx = strict().with_api_version(20220101);
        let old = bind(&json!({"perfect": 0}), "Play", &old_ctx).expect("old");
        assert_eq!(old.model(), "OldPlay");
        assert_eq!(old.boolean("perfect").expect("perfect"), Some(false));
    }

    #[test]
    fn unknown_enum_strict_fails_lenient_synthesizes() {
        let payload = json!({"id": 1, "shape": "hexagon"});
        let err = bind(&payload, "Holder", &strict()).expect_err("strict");
        assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
        assert_eq!(err.path(), Some("$.shape"));

        let (holder, report) = bind_with_report(&payload, "Holder", &lenient()).expect("lenient");
        let shape = holder.enum_value("shape").expect("shape").expect("present");
        assert!(shape.is_unknown());
        assert_eq!(report.count(DriftCode::UnknownEnumValue), 1);
    }

    #[test]
    fn map_values_bind_per_entry() {
        let holder = bind(&json!({"id": 1, "tags": {"a": 1, "b": 2}}), "Holder", &strict())
            .expect("bind");
        let tags = holder.attr("tags").expect("tags").as_map().expect("map");
        assert_eq!(tags.get("b"), Some(&Bound::Int(2)));
    }

    #[test]
    fn datetime_failure_is_located() {
        let err = bind(
            &json!({"id": 1, "children": [{"id": 2, "seen": "not a date"}]}),
            "Holder",
            &lenient(),
        )
        .expect_err("date");
        assert_eq!(err.kind(), ErrorKind::DateParse);
        assert_eq!(err.path(), Some("$.children[0].seen"));
    }

    #[test]
    fn non_object_payload_is_type_mismatch() {
        let err = bind(&json!([1, 2]), "Holder", &lenient()).expect_err("array");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path(), Some("$"));
    }
}
