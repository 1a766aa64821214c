//! Purpose: Constructed model instances and their non-owning back-references.
//! Exports: `Instance`, `ClientHandle`.
//! Role: Immutable bag of bound attributes ordered by the model's field plan.
//! Invariants: An instance never owns its client or its embedding parent (both are `Weak`).
//! Invariants: Attribute access on an absent attribute is `AttributeMissing`, never a default.
//! Invariants: Equality is structural over model name and bound attributes only.
use crate::core::cursor::Cursor;
use crate::core::error::{Error, ErrorKind};
use crate::core::plan::{FieldDescriptor, FieldPlan};
use crate::core::scalar::EnumValue;
use crate::core::value::Bound;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Weak};
use time::OffsetDateTime;

type AnyClient = dyn Any + Send + Sync;

/// Weak reference to the client that produced an instance.
///
/// Opaque to the engine: relations upgrade it and downcast to the concrete
/// client type they are asked to fetch through.
#[derive(Clone, Default)]
pub struct ClientHandle(Option<Weak<AnyClient>>);

impl ClientHandle {
    pub fn detached() -> Self {
        Self(None)
    }

    pub fn attach<C: Any + Send + Sync>(client: &Arc<C>) -> Self {
        let erased: Arc<AnyClient> = Arc::clone(client) as Arc<AnyClient>;
        Self(Some(Arc::downgrade(&erased)))
    }

    pub fn is_attached(&self) -> bool {
        self.0.is_some()
    }

    /// Live client of type `C`, or `None` when detached, dropped, or of another type.
    pub fn upgrade<C: Any + Send + Sync>(&self) -> Option<Arc<C>> {
        let client = self.0.as_ref()?.upgrade()?;
        client.downcast::<C>().ok()
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("ClientHandle(detached)"),
            Some(weak) if weak.strong_count() == 0 => f.write_str("ClientHandle(dropped)"),
            Some(_) => f.write_str("ClientHandle(live)"),
        }
    }
}

/// Weak link to the embedding parent plus its plan, readable while the
/// parent is still under construction.
#[derive(Clone, Default)]
pub(crate) struct ParentHandle(Option<ParentLink>);

#[derive(Clone)]
struct ParentLink {
    inner: Weak<InstanceInner>,
    plan: Arc<FieldPlan>,
}

impl ParentHandle {
    pub(crate) fn none() -> Self {
        Self(None)
    }

    pub(crate) fn is_a(&self, model: &str) -> bool {
        self.0.as_ref().is_some_and(|link| link.plan.is_a(model))
    }

    fn upgrade(&self) -> Option<Instance> {
        let inner = self.0.as_ref()?.inner.upgrade()?;
        Some(Instance { inner })
    }
}

pub(crate) struct InstanceInner {
    plan: Arc<FieldPlan>,
    values: Vec<Option<Bound>>,
    client: ClientHandle,
    parent: ParentHandle,
}

#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    /// Builds an instance whose children can point back at it.
    ///
    /// `fill` receives the handle children should store as their parent and
    /// returns one slot per plan field. The handle cannot be upgraded until
    /// `build` returns.
    pub(crate) fn build(
        plan: Arc<FieldPlan>,
        client: ClientHandle,
        parent: ParentHandle,
        fill: impl FnOnce(&ParentHandle) -> Result<Vec<Option<Bound>>, Error>,
    ) -> Result<Self, Error> {
        let mut failure = None;
        let inner = Arc::new_cyclic(|weak| {
            let handle = ParentHandle(Some(ParentLink {
                inner: weak.clone(),
                plan: Arc::clone(&plan),
            }));
            let values = match fill(&handle) {
                Ok(values) => values,
                Err(err) => {
                    failure = Some(err);
                    Vec::new()
                }
            };
            InstanceInner {
                plan,
                values,
                client,
                parent,
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(Self { inner }),
        }
    }

    /// Constructs an instance directly, without a payload or an owning client.
    ///
    /// Unlisted attributes are absent. Relations on the result that need a
    /// fetch fail with `DetachedInstance`.
    pub fn new<'a>(
        plan: Arc<FieldPlan>,
        attrs: impl IntoIterator<Item = (&'a str, Bound)>,
    ) -> Result<Self, Error> {
        let mut values = vec![None; plan.fields().len()];
        for (attr, value) in attrs {
            let idx = plan.index_of(attr).ok_or_else(|| {
                Error::new(ErrorKind::UnknownField)
                    .with_message("attribute is not declared")
                    .with_model(plan.name())
                    .with_field(attr)
            })?;
            values[idx] = Some(value);
        }
        Ok(Self {
            inner: Arc::new(InstanceInner {
                plan,
                values,
                client: ClientHandle::detached(),
                parent: ParentHandle::none(),
            }),
        })
    }

    pub fn model(&self) -> &'static str {
        self.inner.plan.name()
    }

    pub fn plan(&self) -> &FieldPlan {
        &self.inner.plan
    }

    pub fn is_a(&self, model: &str) -> bool {
        self.inner.plan.is_a(model)
    }

    /// Re-entrant construction: an instance already of `model` is returned as is.
    pub fn downcast(&self, model: &str) -> Result<Instance, Error> {
        if self.is_a(model) {
            return Ok(self.clone());
        }
        Err(Error::new(ErrorKind::TypeMismatch)
            .with_message(format!("`{}` is not a `{model}`", self.model()))
            .with_model(model))
    }

    pub fn client(&self) -> &ClientHandle {
        &self.inner.client
    }

    /// The instance whose payload directly embedded this one, if still alive.
    pub fn parent(&self) -> Option<Instance> {
        self.inner.parent.upgrade()
    }

    fn index(&self, attr: &str) -> Result<usize, Error> {
        self.inner.plan.index_of(attr).ok_or_else(|| {
            Error::new(ErrorKind::AttributeMissing)
                .with_message("attribute is not declared")
                .with_model(self.model())
                .with_field(attr)
        })
    }

    fn absent(&self, attr: &str) -> Error {
        Error::new(ErrorKind::AttributeMissing)
            .with_message("attribute was absent from the payload")
            .with_model(self.model())
            .with_field(attr)
    }

    /// True when the payload carried the attribute (null included).
    pub fn has(&self, attr: &str) -> bool {
        self.inner
            .plan
            .index_of(attr)
            .is_some_and(|idx| self.inner.values[idx].is_some())
    }

    /// The bound value as carried by this instance's own payload.
    pub fn attr(&self, attr: &str) -> Result<&Bound, Error> {
        let idx = self.index(attr)?;
        self.inner.values[idx]
            .as_ref()
            .ok_or_else(|| self.absent(attr))
    }

    /// Like [`Instance::attr`], falling back to the embedding parent for
    /// attributes declared as inherited, when that parent is of the declared model.
    pub fn get(&self, attr: &str) -> Result<Cow<'_, Bound>, Error> {
        let idx = self.index(attr)?;
        if let Some(value) = &self.inner.values[idx] {
            return Ok(Cow::Borrowed(value));
        }
        let descriptor = &self.inner.plan.fields()[idx];
        if let Some(source) = descriptor.inherit {
            if let Some(parent) = self.parent().filter(|parent| parent.is_a(source.model)) {
                let value = parent.get(source.attr)?.into_owned();
                return Ok(Cow::Owned(value));
            }
            return Err(self.absent(attr).with_hint(format!(
                "`{attr}` falls back to `{}` of an embedding `{}`, and there is none",
                source.attr, source.model
            )));
        }
        Err(self.absent(attr))
    }

    /// Present attributes in plan order.
    pub fn attrs(&self) -> impl Iterator<Item = (&FieldDescriptor, &Bound)> {
        self.inner
            .plan
            .fields()
            .iter()
            .zip(self.inner.values.iter())
            .filter_map(|(descriptor, value)| value.as_ref().map(|value| (descriptor, value)))
    }

    fn narrow<'v, T>(
        &self,
        attr: &str,
        value: &'v Bound,
        expected: &str,
        pick: impl FnOnce(&'v Bound) -> Option<T>,
    ) -> Result<Option<T>, Error> {
        if value.is_null() {
            return Ok(None);
        }
        let found = value.kind_name();
        pick(value).map(Some).ok_or_else(|| {
            Error::new(ErrorKind::TypeMismatch)
                .with_message(format!("attribute holds {found}, not {expected}"))
                .with_model(self.model())
                .with_field(attr)
        })
    }

    pub fn int(&self, attr: &str) -> Result<Option<i64>, Error> {
        let value = self.get(attr)?;
        self.narrow(attr, &value, "int", Bound::as_int)
    }

    pub fn float(&self, attr: &str) -> Result<Option<f64>, Error> {
        let value = self.get(attr)?;
        self.narrow(attr, &value, "float", Bound::as_float)
    }

    pub fn boolean(&self, attr: &str) -> Result<Option<bool>, Error> {
        let value = self.get(attr)?;
        self.narrow(attr, &value, "bool", Bound::as_bool)
    }

    pub fn datetime(&self, attr: &str) -> Result<Option<OffsetDateTime>, Error> {
        let value = self.get(attr)?;
        self.narrow(attr, &value, "datetime", Bound::as_datetime)
    }

    pub fn str(&self, attr: &str) -> Result<Option<&str>, Error> {
        self.narrow(attr, self.attr(attr)?, "str", Bound::as_str)
    }

    pub fn enum_value(&self, attr: &str) -> Result<Option<&EnumValue>, Error> {
        self.narrow(attr, self.attr(attr)?, "enum", Bound::as_enum)
    }

    pub fn instance(&self, attr: &str) -> Result<Option<&Instance>, Error> {
        self.narrow(attr, self.attr(attr)?, "model", Bound::as_instance)
    }

    pub fn list(&self, attr: &str) -> Result<Option<&[Bound]>, Error> {
        self.narrow(attr, self.attr(attr)?, "list", Bound::as_list)
    }

    pub fn cursor(&self, attr: &str) -> Result<Option<&Cursor>, Error> {
        self.narrow(attr, self.attr(attr)?, "cursor", Bound::as_cursor)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.model() == other.model() && self.inner.values == other.inner.values)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.model());
        for (descriptor, value) in self.attrs() {
            out.field(descriptor.attr, value);
        }
        out.finish()
    }
}
