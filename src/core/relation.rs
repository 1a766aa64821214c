//! Purpose: Relation declarations and the Relation Resolver.
//! Exports: `EntityKind`, `RelationKind`, `RelationDecl`, `FetchRequest`, `Fetch`, `FetchFuture`,
//!          `Related`.
//! Role: Turns a foreign key on an instance into an embedded value or a fetch through its client.
//! Invariants: Embedded values are returned without I/O; nothing is memoized.
//! Invariants: A fetch without a live owning client fails fast with `DetachedInstance`.
//! Invariants: How a fetch is awaited is the client's choice (`Fetch::Output`), not the engine's.
use crate::core::error::{Error, ErrorKind};
use crate::core::instance::Instance;
use crate::core::value::Bound;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntityKind {
    User,
    Beatmap,
    Beatmapset,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Beatmap => "beatmap",
            EntityKind::Beatmapset => "beatmapset",
        }
    }

    /// Model a full fetch of this entity binds as.
    pub fn model(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Beatmap => "Beatmap",
            EntityKind::Beatmapset => "Beatmapset",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationKind {
    /// The instance already is the complete entity.
    Identity,
    ForeignKey {
        entity: EntityKind,
        key: &'static str,
        embedded: Option<&'static str>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationDecl {
    pub name: &'static str,
    pub kind: RelationKind,
}

impl RelationDecl {
    pub const fn identity(name: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::Identity,
        }
    }

    pub const fn foreign(name: &'static str, entity: EntityKind, key: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::ForeignKey {
                entity,
                key,
                embedded: None,
            },
        }
    }

    /// Attribute that may already hold the related entity.
    pub const fn embedded(self, attr: &'static str) -> Self {
        match self.kind {
            RelationKind::ForeignKey { entity, key, .. } => Self {
                name: self.name,
                kind: RelationKind::ForeignKey {
                    entity,
                    key,
                    embedded: Some(attr),
                },
            },
            RelationKind::Identity => self,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FetchRequest {
    pub entity: EntityKind,
    pub id: i64,
}

pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Instance, Error>> + Send>>;

/// Fetch-by-id primitive exposed by an owning client.
///
/// Blocking clients use `Result<Instance, Error>` as `Output`; async clients
/// return a [`FetchFuture`]. Binding is identical for both.
pub trait Fetch: Send + Sync + 'static {
    type Output;

    fn fetch(self: Arc<Self>, request: FetchRequest) -> Self::Output;
}

/// Outcome of a relation accessor.
pub enum Related<O> {
    /// The foreign key is null; there is nothing to relate to.
    Absent,
    /// Already present on the instance; possibly a less complete model.
    Embedded(Instance),
    /// Issued through the owning client.
    Fetched(O),
}

impl<O> Related<O> {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Related::Fetched(_))
    }
}

impl<O> fmt::Debug for Related<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Related::Absent => f.write_str("Absent"),
            Related::Embedded(instance) => f.debug_tuple("Embedded").field(instance).finish(),
            Related::Fetched(_) => f.write_str("Fetched(..)"),
        }
    }
}

impl Related<Result<Instance, Error>> {
    pub fn resolve(self) -> Result<Option<Instance>, Error> {
        match self {
            Related::Absent => Ok(None),
            Related::Embedded(instance) => Ok(Some(instance)),
            Related::Fetched(result) => result.map(Some),
        }
    }
}

impl Related<FetchFuture> {
    pub async fn resolve(self) -> Result<Option<Instance>, Error> {
        match self {
            Related::Absent => Ok(None),
            Related::Embedded(instance) => Ok(Some(instance)),
            Related::Fetched(future) => future.await.map(Some),
        }
    }
}

impl Instance {
    /// Invokes the relation `name` through an owning client of type `C`.
    pub fn relation<C: Fetch>(&self, name: &str) -> Result<Related<C::Output>, Error> {
        let decl = self.plan().relation(name).ok_or_else(|| {
            Error::new(ErrorKind::AttributeMissing)
                .with_message("no such relation")
                .with_model(self.model())
                .with_field(name)
        })?;
        let (entity, key, embedded) = match decl.kind {
            RelationKind::Identity => return Ok(Related::Embedded(self.clone())),
            RelationKind::ForeignKey {
                entity,
                key,
                embedded,
            } => (entity, key, embedded),
        };

        if let Some(attr) = embedded {
            if let Ok(Bound::Model(instance)) = self.attr(attr) {
                return Ok(Related::Embedded(instance.clone()));
            }
        }

        let id = match self.int(key) {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(Related::Absent),
            Err(err) => return Err(err.with_message(format!("relation `{name}` needs `{key}`"))),
        };

        let client = self.client().upgrade::<C>().ok_or_else(|| {
            let reason = if self.client().is_attached() {
                "owning client is gone or is not the requested client type"
            } else {
                "instance was constructed without an owning client"
            };
            Error::new(ErrorKind::DetachedInstance)
                .with_message(reason)
                .with_model(self.model())
                .with_field(name)
        })?;
        tracing::debug!(model = self.model(), relation = name, %entity, id, "fetching relation");
        Ok(Related::Fetched(client.fetch(FetchRequest { entity, id })))
    }

    /// Blocking convenience over [`Instance::relation`].
    pub fn related<C>(&self, name: &str) -> Result<Option<Instance>, Error>
    where
        C: Fetch<Output = Result<Instance, Error>>,
    {
        self.relation::<C>(name)?.resolve()
    }
}
