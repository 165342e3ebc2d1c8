//! Description of the HTTP API, served at `/openapi.json`, and the two pages rendering it.

use serde_json::{json, Value};

pub const TITLE: &str = "Mergington High School API";
const DESCRIPTION: &str = "API for viewing and signing up for extracurricular activities";

fn detail_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Detail" }
            }
        }
    })
}

fn participant_operation(summary: &str, operation_id: &str, errors: [(&str, &str); 2]) -> Value {
    let mut responses = json!({
        "200": {
            "description": "Successful Response",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Message" }
                }
            }
        },
        "422": detail_response("Missing email query parameter"),
    });
    for (code, description) in errors {
        responses[code] = detail_response(description);
    }
    json!({
        "summary": summary,
        "operationId": operation_id,
        "parameters": [
            {
                "name": "activity_name",
                "in": "path",
                "required": true,
                "schema": { "type": "string", "title": "Activity Name" }
            },
            {
                "name": "email",
                "in": "query",
                "required": true,
                "schema": { "type": "string", "title": "Email" }
            }
        ],
        "responses": responses,
    })
}

/// The OpenAPI 3.1 document.
pub fn document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": TITLE,
            "description": DESCRIPTION,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/activities": {
                "get": {
                    "summary": "Get Activities",
                    "operationId": "get_activities",
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "additionalProperties": {
                                            "$ref": "#/components/schemas/Activity"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/activities/{activity_name}/signup": {
                "post": participant_operation(
                    "Signup For Activity",
                    "signup_for_activity",
                    [
                        ("400", "Student is already signed up for this activity"),
                        ("404", "Activity not found"),
                    ],
                )
            },
            "/activities/{activity_name}/unregister": {
                "delete": participant_operation(
                    "Unregister From Activity",
                    "unregister_from_activity",
                    [
                        ("400", "Student is not registered for this activity"),
                        ("404", "Activity not found"),
                    ],
                )
            }
        },
        "components": {
            "schemas": {
                "Activity": {
                    "type": "object",
                    "required": ["description", "schedule", "max_participants", "participants"],
                    "properties": {
                        "description": { "type": "string" },
                        "schedule": { "type": "string" },
                        "max_participants": { "type": "integer", "minimum": 1 },
                        "participants": { "type": "array", "items": { "type": "string" } }
                    }
                },
                "Message": {
                    "type": "object",
                    "required": ["message"],
                    "properties": { "message": { "type": "string" } }
                },
                "Detail": {
                    "type": "object",
                    "required": ["detail"],
                    "properties": { "detail": { "type": "string" } }
                }
            }
        }
    })
}

pub fn swagger_ui_html() -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
<title>{TITLE} - Swagger UI</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
SwaggerUIBundle({{ url: "/openapi.json", dom_id: "#swagger-ui" }});
</script>
</body>
</html>
"##
    )
}

pub fn redoc_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{TITLE} - ReDoc</title>
</head>
<body>
<redoc spec-url="/openapi.json"></redoc>
<script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>
"#
    )
}
