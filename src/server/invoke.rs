//! The single entry point bound to every generated route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;
use serde_json::{json, Map, Value};

use super::{respond, AppState};
use crate::envelope::Envelope;
use crate::executor::{ExecutorError, Invocation};
use crate::registry::{Command, ParameterKind};
use crate::routing::{RouteTable, RouteTarget, StaticRoute};

/// Body key naming the command on the `/command` route.
pub const COMMAND_KEY: &str = "command";

/// Request parameters in precedence order; the first binding of a name wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    fn insert(&mut self, name: String, value: String) {
        if self.get(&name).is_none() {
            self.0.push((name, value));
        }
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

/// Outcome of handling one request: the envelope plus an optional explicit
/// payload.
type Handled = (Envelope, Option<Value>);

/// Axum handler: resolve, bind, execute, render.
pub async fn invoke(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let (envelope, data) = handle(&state, &method, &uri, &body).await;
    let response = respond(&envelope, data);
    tracing::info!(
        method = %method,
        path = uri.path(),
        status = response.status().as_u16(),
        "request handled"
    );
    response
}

async fn handle(state: &AppState, method: &Method, uri: &Uri, body: &[u8]) -> Handled {
    let table = state.table.as_ref();

    let Some(matched) = table.resolve(uri.path()) else {
        return failure("Not Found", 404);
    };
    let route = matched.descriptor;
    tracing::debug!(route = %route.route_name, "route resolved");

    if !table.methods().allows(method.as_str()) {
        return failure("Method Not Allowed", 405);
    }

    let mut fields = match parse_body(body) {
        Ok(fields) => fields,
        Err(message) => return failure(message, 422),
    };

    // On `/command` only the body names the command, so a `command` query
    // parameter still binds to the command's own signature.
    let requested = match &route.target {
        RouteTarget::Static(StaticRoute::Command) => match fields.remove(COMMAND_KEY) {
            Some(Value::String(name)) => Some(name),
            Some(_) => return failure(format!("`{}` must be a string", COMMAND_KEY), 422),
            None => {
                return failure(format!("missing `{}` in request body", COMMAND_KEY), 422)
            }
        },
        _ => None,
    };

    let params = match collect_params(matched.captured, fields, uri.query()) {
        Ok(params) => params,
        Err(message) => return failure(message, 422),
    };

    match (&route.target, requested) {
        (RouteTarget::Static(StaticRoute::All), _) => listing(table),
        (RouteTarget::Command(name), _) => match table.command(name) {
            Some(command) => run(state, command, &params).await,
            None => failure("Not Found", 404),
        },
        // Forbidden and unexposed hidden commands are absent from the table.
        (RouteTarget::Static(StaticRoute::Command), requested) => {
            match requested.as_deref().and_then(|name| table.command(name)) {
                Some(command) => run(state, command, &params).await,
                None => failure("Not Found", 404),
            }
        }
    }
}

fn failure(message: impl Into<String>, status: u16) -> Handled {
    let mut envelope = Envelope::new();
    envelope.error(message, Some(status));
    (envelope, None)
}

/// Payload of the `/all` route.
fn listing(table: &RouteTable) -> Handled {
    let commands: Vec<Value> = table
        .descriptors()
        .iter()
        .filter_map(|route| {
            let command = table.command(route.command()?)?;
            Some(json!({
                "name": command.name,
                "description": command.description,
                "route": route.route_name,
                "uri": route.uri,
            }))
        })
        .collect();

    let mut envelope = Envelope::new();
    envelope.set_status(200);
    let payload = json!({
        "ok": true,
        "routes": table.routes(),
        "static_routes": table.static_routes(),
        "commands": commands,
    });
    (envelope, Some(payload))
}

async fn run(state: &AppState, command: &Command, params: &Params) -> Handled {
    let invocation = match bind(command, params) {
        Ok(invocation) => invocation,
        Err(message) => return failure(message, 422),
    };

    let mut envelope = Envelope::new();
    match state.executor.execute(&invocation).await {
        Ok(result) if result.success => {
            envelope.set_output(result.output, Some(200));
        }
        Ok(result) => {
            tracing::info!(
                command = %command.name,
                exit_code = ?result.exit_code,
                "command failed"
            );
            envelope.error(result.output, Some(500));
        }
        Err(ExecutorError::Timeout(seconds)) => {
            tracing::warn!(command = %command.name, seconds, "command timed out");
            envelope.error("command timed out", Some(504));
        }
        Err(e) => {
            tracing::error!(command = %command.name, error = %e, "command could not be executed");
            envelope.error("command could not be executed", Some(500));
        }
    }
    (envelope, None)
}

/// Parse a request body as a JSON object; a blank body has no fields.
pub fn parse_body(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    let parsed: Value =
        serde_json::from_slice(body).map_err(|e| format!("invalid JSON body: {}", e))?;
    match parsed {
        Value::Object(fields) => Ok(fields),
        _ => Err("request body must be a JSON object".to_string()),
    }
}

/// Merge path captures, body fields and query string, in that precedence.
pub fn collect_params(
    captured: Vec<(String, String)>,
    fields: Map<String, Value>,
    query: Option<&str>,
) -> Result<Params, String> {
    let mut params = Params::default();
    for (name, value) in captured {
        params.insert(name, value);
    }

    for (name, value) in fields {
        if let Some(value) = scalar(&name, value)? {
            params.insert(name, value);
        }
    }

    for (name, value) in parse_query(query.unwrap_or_default()) {
        params.insert(name, value);
    }

    Ok(params)
}

fn scalar(name: &str, value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => {
            Err(format!("parameter `{}` must be a scalar value", name))
        }
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decode = |raw: &str| {
                urlencoding::decode(&raw.replace('+', " "))
                    .ok()
                    .map(|decoded| decoded.into_owned())
            };
            Some((decode(name)?, decode(value)?))
        })
        .collect()
}

/// Bind request parameters to a command signature.
pub fn bind(command: &Command, params: &Params) -> Result<Invocation, String> {
    if let Some(unknown) = params.names().find(|name| command.parameter(name).is_none()) {
        return Err(format!("unknown parameter `{}`", unknown));
    }

    let mut invocation = Invocation::new(command.name.clone());
    let mut skipped: Option<&str> = None;
    for parameter in &command.signature {
        let value = params.get(&parameter.name);
        match (parameter.kind, value) {
            (ParameterKind::Argument, Some(value)) => {
                if let Some(gap) = skipped {
                    return Err(format!(
                        "argument `{}` given without preceding argument `{}`",
                        parameter.name, gap
                    ));
                }
                invocation = invocation.argument(value);
            }
            (ParameterKind::Option, Some(value)) => {
                invocation = invocation.option(parameter.name.clone(), Some(value.to_string()));
            }
            (_, None) if parameter.required => {
                return Err(format!("missing required {} `{}`", parameter.kind, parameter.name));
            }
            (ParameterKind::Argument, None) => {
                skipped.get_or_insert(parameter.name.as_str());
            }
            (ParameterKind::Option, None) => {}
        }
    }

    Ok(invocation)
}
