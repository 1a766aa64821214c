//! Purpose: Hold top-level CLI command dispatch for `ossbind`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Every command writes exactly one JSON document to stdout on success.
//! Invariants: Drift is reported, never turned into a failure, unless `--strict` is set.

use super::*;
use ossbind::api::{
    BindContext, Client, DriftReport, Instance, bind_with_report, decode_json, registry,
};
use ossbind::core::plan::FieldPlan;
use ossbind::core::relation::RelationKind;

pub(super) fn dispatch_command(
    command: Command,
    settings: &GlobalSettings,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "ossbind", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
        Command::Bind {
            model,
            file,
            report,
            wire,
        } => {
            let config = settings.client_config(None)?;
            let (text, source) = read_input(file.as_deref())?;
            let payload = decode_json(&text, &source)?;
            let ctx = BindContext::new(registry())
                .with_mode(config.mode())
                .with_api_version(config.api_version());
            let (instance, drift) = bind_with_report(&payload, &model, &ctx)?;
            emit_bound(&instance, &drift, report, wire)?;
            Ok(RunOutcome::ok())
        }
        Command::Fetch {
            entity,
            id,
            base_url,
            report,
        } => {
            let config = settings.client_config(base_url.as_deref())?;
            let client = Client::new(config);
            let payload = client.get_json(&format!("{}/{id}", entity.collection()))?;
            let (instance, drift) =
                bind_with_report(&payload, entity.model(), &client.bind_context())?;
            emit_bound(&instance, &drift, report, false)?;
            Ok(RunOutcome::ok())
        }
        Command::Describe { model } => {
            let registry = registry();
            let plans = match model {
                Some(name) => vec![registry.plan_for(&name).map_err(|err| {
                    err.with_hint("Run `ossbind describe` without a name to list every model.")
                })?],
                None => registry
                    .models()
                    .map(|decl| registry.plan(decl))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            let models = plans.iter().map(|plan| plan_json(plan)).collect::<Vec<_>>();
            emit_json(json!({ "models": models }));
            Ok(RunOutcome::ok())
        }
    }
}

fn emit_bound(
    instance: &Instance,
    drift: &DriftReport,
    report: bool,
    wire: bool,
) -> Result<(), Error> {
    let body = if wire {
        instance.to_wire()?
    } else {
        instance.to_json()?
    };
    if !drift.is_clean() {
        tracing::info!(
            model = instance.model(),
            issues = drift.issue_count,
            "bound with tolerated drift"
        );
    }
    if report {
        let drift = serde_json::to_value(drift).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode drift report")
                .with_source(err)
        })?;
        emit_json(json!({
            "model": instance.model(),
            "instance": body,
            "report": drift,
        }));
    } else {
        emit_json(body);
    }
    Ok(())
}

fn plan_json(plan: &FieldPlan) -> Value {
    let decl = plan.model();
    let fields = plan
        .fields()
        .iter()
        .map(|field| {
            let mut entry = Map::new();
            entry.insert("attr".to_string(), json!(field.attr));
            entry.insert("wire".to_string(), json!(field.wire));
            entry.insert("type".to_string(), json!(field.declared.to_string()));
            entry.insert("required".to_string(), json!(field.required));
            if field.owner != decl.name {
                entry.insert("declared_on".to_string(), json!(field.owner));
            }
            if let Some(source) = field.inherit {
                entry.insert(
                    "inherit".to_string(),
                    json!({ "model": source.model, "attr": source.attr }),
                );
            }
            Value::Object(entry)
        })
        .collect::<Vec<_>>();
    let relations = plan
        .relations()
        .iter()
        .map(|relation| match relation.kind {
            RelationKind::Identity => json!({ "name": relation.name, "kind": "identity" }),
            RelationKind::ForeignKey {
                entity,
                key,
                embedded,
            } => json!({
                "name": relation.name,
                "kind": "foreign_key",
                "entity": entity.as_str(),
                "key": key,
                "embedded": embedded,
            }),
        })
        .collect::<Vec<_>>();

    let mut out = Map::new();
    out.insert("name".to_string(), json!(decl.name));
    if let Some(parent) = decl.extends {
        out.insert("extends".to_string(), json!(parent));
    }
    if !decl.doc.is_empty() {
        out.insert("doc".to_string(), json!(decl.doc));
    }
    out.insert("polymorphic".to_string(), json!(decl.select.is_some()));
    out.insert("fields".to_string(), Value::Array(fields));
    out.insert("relations".to_string(), Value::Array(relations));
    Value::Object(out)
}
