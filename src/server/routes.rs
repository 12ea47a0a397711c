use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn json_ok(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!("{{\"error\": {}}}", serde_json::json!(message)),
    }
}

fn serialized(result: Result<String, serde_json::Error>) -> HttpResponse {
    match result {
        Ok(payload) => json_ok(payload),
        Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn serialized_lookup(
    result: Result<Option<String>, serde_json::Error>,
    missing: &str,
) -> HttpResponse {
    match result {
        Ok(Some(payload)) => json_ok(payload),
        Ok(None) => error_response(404, "Not Found", missing),
        Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

pub fn route_request(method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);

    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => serialized(api::health_payload()),
        ("GET", "/api/unit-types") => serialized(api::unit_types_payload()),
        ("GET", "/api/strategies") => serialized(api::strategies_payload()),
        ("GET", "/api/armies") => serialized(api::armies_payload()),
        ("GET", "/api/battles") => serialized(api::battles_payload()),
        ("POST", "/api/battles") => match api::start_battle_payload(body) {
            Ok(payload) => json_ok(payload),
            Err(api::StartBattlePayloadError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::StartBattlePayloadError::Validation(msg)) => {
                error_response(400, "Bad Request", &msg)
            }
            Err(api::StartBattlePayloadError::NotFound(msg)) => {
                error_response(404, "Not Found", &msg)
            }
            Err(api::StartBattlePayloadError::Internal(msg)) => {
                error_response(500, "Internal Server Error", &msg)
            }
        },
        _ => route_parameterized(method, path),
    }
}

/// Routes with a path parameter: /api/armies/<id>[/battles] and
/// /api/battles/<id>[/report].
fn route_parameterized(method: &str, path: &str) -> HttpResponse {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        ("GET", ["api", "armies", army_id]) => {
            serialized_lookup(api::army_payload(army_id), "Army not found")
        }
        ("GET", ["api", "armies", army_id, "battles"]) => {
            serialized_lookup(api::army_battles_payload(army_id), "Army not found")
        }
        ("GET", ["api", "battles", battle_id]) => {
            serialized_lookup(api::battle_payload(battle_id), "Battle not found")
        }
        ("GET", ["api", "battles", battle_id, "report"]) => {
            serialized_lookup(api::battle_report_payload(battle_id), "Battle not found")
        }
        ("DELETE", ["api", "battles", battle_id]) => {
            match api::delete_battle_payload(battle_id) {
                Ok(true) => json_ok("{\"deleted\": true}".to_string()),
                Ok(false) => error_response(404, "Not Found", "Battle not found"),
                Err(msg) => error_response(500, "Internal Server Error", &msg),
            }
        }
        _ => error_response(404, "Not Found", "Unknown route"),
    }
}

fn index_html() -> String {
    "<!doctype html>\n<html>\n<head><title>garrison</title></head>\n<body>\n\
     <h1>garrison</h1>\n\
     <p>Army battle simulation API. Endpoints under <code>/api</code>:</p>\n\
     <ul>\n\
     <li>GET /api/health</li>\n\
     <li>GET /api/unit-types</li>\n\
     <li>GET /api/strategies</li>\n\
     <li>GET /api/armies, /api/armies/&lt;id&gt;, /api/armies/&lt;id&gt;/battles</li>\n\
     <li>POST /api/battles, GET /api/battles, /api/battles/&lt;id&gt;, /api/battles/&lt;id&gt;/report</li>\n\
     </ul>\n</body>\n</html>\n"
        .to_string()
}
