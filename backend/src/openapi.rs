//! OpenAPI document served at `/openapi.json`.
//!
//! Describes the REST flavour of the time tool the way the upstream
//! mcp-time proxy publishes it, including the bearer scheme that this mock
//! advertises but never checks.

use mcp_time_types::{SERVER_NAME, SERVER_VERSION};
use serde_json::{json, Value};

fn get_current_time_operation() -> Value {
    json!({
        "summary": "Get Current Time",
        "description": "Get current time in a specific timezone",
        "operationId": "tool_get_current_time_post",
        "requestBody": {
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/get_current_time_form_model" }
                }
            },
            "required": true
        },
        "responses": {
            "200": {
                "description": "Successful Response",
                "content": {
                    "application/json": {
                        "schema": { "title": "Response Tool Get Current Time Post" }
                    }
                }
            },
            "422": {
                "description": "Validation Error",
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/HTTPValidationError" }
                    }
                }
            }
        },
        "security": [ { "HTTPBearer": [] } ]
    })
}

fn schemas() -> Value {
    json!({
        "HTTPValidationError": {
            "properties": {
                "detail": {
                    "items": { "$ref": "#/components/schemas/ValidationError" },
                    "type": "array",
                    "title": "Detail"
                }
            },
            "type": "object",
            "title": "HTTPValidationError"
        },
        "ValidationError": {
            "properties": {
                "loc": {
                    "items": {
                        "anyOf": [ { "type": "string" }, { "type": "integer" } ]
                    },
                    "type": "array",
                    "title": "Location"
                },
                "msg": { "type": "string", "title": "Message" },
                "type": { "type": "string", "title": "Error Type" }
            },
            "type": "object",
            "required": ["loc", "msg", "type"],
            "title": "ValidationError"
        },
        "get_current_time_form_model": {
            "properties": {
                "timezone": {
                    "type": "string",
                    "title": "Timezone",
                    "description": "timezone name"
                }
            },
            "type": "object",
            "required": ["timezone"],
            "title": "get_current_time_form_model"
        }
    })
}

/// The complete OpenAPI 3.1 document.
pub fn document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": SERVER_NAME,
            "description": format!("{} MCP Server", SERVER_NAME),
            "version": SERVER_VERSION
        },
        "paths": {
            "/get_current_time": {
                "post": get_current_time_operation()
            }
        },
        "components": {
            "schemas": schemas(),
            "securitySchemes": {
                "HTTPBearer": { "type": "http", "scheme": "bearer" }
            }
        }
    })
}
