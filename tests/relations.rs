//! Purpose: Relation resolution through in-memory owning clients, blocking and async.
//! Exports: Integration tests only.
//! Role: Prove embedded short-circuits, fetch delegation, absence, and detached failures.
//! Invariants: No network; clients serve canned payloads keyed by entity and id.
use ossbind::api::{
    BindContext, ClientHandle, EntityKind, Error, ErrorKind, Fetch, FetchFuture, FetchRequest,
    Instance, Mode, Related, bind, registry,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Catalogue {
    payloads: HashMap<(EntityKind, i64), Value>,
    fetches: AtomicUsize,
}

impl Catalogue {
    fn new() -> Arc<Self> {
        let mut payloads = HashMap::new();
        payloads.insert(
            (EntityKind::User, 2),
            json!({"id": 2, "username": "peppy", "join_date": "2007-08-28T03:09:12Z"}),
        );
        payloads.insert((EntityKind::User, 3), json!({"id": 3, "username": "BanchoBot"}));
        Arc::new(Self {
            payloads,
            fetches: AtomicUsize::new(0),
        })
    }

    fn context(self: &Arc<Self>) -> BindContext<'static> {
        BindContext::new(registry())
            .with_mode(Mode::Lenient)
            .with_client(ClientHandle::attach(self))
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Fetch for Catalogue {
    type Output = Result<Instance, Error>;

    fn fetch(self: Arc<Self>, request: FetchRequest) -> Self::Output {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let payload = self
            .payloads
            .get(&(request.entity, request.id))
            .ok_or_else(|| {
                Error::new(ErrorKind::Transport)
                    .with_message("osu! API returned status 404")
                    .with_value(format!("{}/{}", request.entity, request.id))
            })?;
        bind(payload, request.entity.model(), &self.context())
    }
}

struct Unrelated;

impl Fetch for Unrelated {
    type Output = Result<Instance, Error>;

    fn fetch(self: Arc<Self>, _request: FetchRequest) -> Self::Output {
        Err(Error::new(ErrorKind::Internal))
    }
}

fn beatmapset(with_user: bool) -> Value {
    let mut payload = json!({"id": 1, "title": "DISCO PRINCE", "user_id": 2});
    if with_user {
        payload["user"] = json!({"id": 2, "username": "peppy"});
    }
    payload
}

#[test]
fn embedded_values_resolve_without_io() {
    let client = Catalogue::new();
    let set = bind(&beatmapset(true), "BeatmapsetCompact", &client.context()).expect("bind");
    let related = set.relation::<Catalogue>("user").expect("relation");
    assert!(matches!(related, Related::Embedded(_)));
    let user = related.resolve().expect("resolve").expect("some");
    assert_eq!(user.model(), "UserCompact");
    assert_eq!(client.fetches(), 0);
}

#[test]
fn missing_embeds_fetch_through_the_owning_client_every_time() {
    let client = Catalogue::new();
    let set = bind(&beatmapset(false), "BeatmapsetCompact", &client.context()).expect("bind");

    let user = set.related::<Catalogue>("user").expect("fetch").expect("some");
    assert_eq!(user.model(), "User");
    assert_eq!(user.str("username").expect("username"), Some("peppy"));
    assert_eq!(client.fetches(), 1);

    set.related::<Catalogue>("user").expect("refetch");
    assert_eq!(client.fetches(), 2);
}

#[test]
fn fetched_instances_stay_attached_to_the_client() {
    let client = Catalogue::new();
    let compact = bind(&json!({"id": 2, "username": "peppy"}), "UserCompact", &client.context())
        .expect("bind");
    let full = compact.related::<Catalogue>("expand").expect("expand").expect("some");
    assert_eq!(full.model(), "User");

    let again = full.related::<Catalogue>("expand").expect("identity").expect("some");
    assert_eq!(again, full);
    assert_eq!(client.fetches(), 1);
}

#[test]
fn null_foreign_key_is_absent() {
    let client = Catalogue::new();
    let event = bind(
        &json!({
            "id": 1,
            "type": "love",
            "comment": null,
            "created_at": "2020-01-01T00:00:00Z",
            "user_id": null
        }),
        "BeatmapsetEvent",
        &client.context(),
    )
    .expect("bind");
    assert!(matches!(
        event.relation::<Catalogue>("user").expect("relation"),
        Related::Absent
    ));
    assert_eq!(client.fetches(), 0);
}

#[test]
fn client_errors_pass_through_unchanged() {
    let client = Catalogue::new();
    let relation = bind(
        &json!({"target_id": 404, "relation_type": "friend", "mutual": false}),
        "UserRelation",
        &client.context(),
    )
    .expect("bind");
    let err = relation.related::<Catalogue>("target").expect_err("missing user");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.value(), Some("user/404"));
}

#[test]
fn standalone_instances_are_detached() {
    let ctx = BindContext::new(registry()).with_mode(Mode::Lenient);
    let set = bind(&beatmapset(false), "BeatmapsetCompact", &ctx).expect("bind");
    let err = set.relation::<Catalogue>("user").expect_err("detached");
    assert_eq!(err.kind(), ErrorKind::DetachedInstance);
    assert_eq!(err.field(), Some("user"));

    // embedded values need no client
    let set = bind(&beatmapset(true), "BeatmapsetCompact", &ctx).expect("bind");
    assert!(set.related::<Catalogue>("user").expect("embedded").is_some());
}

#[test]
fn dropped_or_mismatched_clients_fail_fast() {
    let client = Catalogue::new();
    let set = bind(&beatmapset(false), "BeatmapsetCompact", &client.context()).expect("bind");

    let err = set.relation::<Unrelated>("user").expect_err("wrong client type");
    assert_eq!(err.kind(), ErrorKind::DetachedInstance);

    drop(client);
    let err = set.relation::<Catalogue>("user").expect_err("client dropped");
    assert_eq!(err.kind(), ErrorKind::DetachedInstance);
}

struct AsyncCatalogue {
    inner: Arc<Catalogue>,
}

impl Fetch for AsyncCatalogue {
    type Output = FetchFuture;

    fn fetch(self: Arc<Self>, request: FetchRequest) -> Self::Output {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let payload = self
                .inner
                .payloads
                .get(&(request.entity, request.id))
                .cloned()
                .ok_or_else(|| Error::new(ErrorKind::Transport))?;
            let ctx = BindContext::new(registry()).with_client(ClientHandle::attach(&self));
            bind(&payload, request.entity.model(), &ctx)
        })
    }
}

#[tokio::test]
async fn async_clients_return_futures_from_the_same_binding() {
    let client = Arc::new(AsyncCatalogue {
        inner: Catalogue::new(),
    });
    let ctx = BindContext::new(registry()).with_client(ClientHandle::attach(&client));
    let set = bind(&beatmapset(false), "BeatmapsetCompact", &ctx).expect("bind");

    let related = set.relation::<AsyncCatalogue>("user").expect("relation");
    assert!(related.is_fetch());
    let user = related.resolve().await.expect("resolve").expect("some");
    assert_eq!(user.model(), "User");
    assert!(user.client().upgrade::<AsyncCatalogue>().is_some());

    let set = bind(&beatmapset(true), "BeatmapsetCompact", &ctx).expect("bind");
    let user = set
        .relation::<AsyncCatalogue>("user")
        .expect("relation")
        .resolve()
        .await
        .expect("embedded")
        .expect("some");
    assert_eq!(user.model(), "UserCompact");
}
