// service/src/web/docs.rs

//! OpenAPI document derived from the route table, plus the Swagger UI page.

use actix_web::{web, HttpResponse};
use catalog_pipeline::{Constraint, Location, Rule};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::config::DOCS_PATH;
use crate::web::routes::{DocPayload, RouteDef, RouteTable};

pub const OPENAPI_VERSION: &str = "3.0.2";
pub const API_TITLE: &str = "Product Catalog API";
pub const API_VERSION: &str = "1.0.0";
const SWAGGER_UI_VERSION: &str = "5.18.2";
const TAG: &str = "Products";

fn schema_type(rules: &[&Rule]) -> &'static str {
  for rule in rules {
    match rule.constraint {
      Constraint::IsInteger => return "integer",
      Constraint::IsNumeric => return "number",
      Constraint::IsBoolean => return "boolean",
      _ => {}
    }
  }
  "string"
}

/// A field is required when one of its rules fails for a missing value.
fn is_required(rules: &[&Rule]) -> bool {
  rules.iter().any(|r| !r.constraint.check(None))
}

/// Rules grouped by field for one location, in declaration order.
fn fields_at<'a>(route: &'a RouteDef, location: Location) -> Vec<(&'a str, Vec<&'a Rule>)> {
  let mut fields: Vec<(&str, Vec<&Rule>)> = Vec::new();
  for rule in route.rules.rules().iter().filter(|r| r.target.location() == location) {
    let name = rule.target.field();
    match fields.iter_mut().find(|(field, _)| *field == name) {
      Some((_, rules)) => rules.push(rule),
      None => fields.push((name, vec![rule])),
    }
  }
  fields
}

fn parameters(route: &RouteDef) -> Vec<Value> {
  fields_at(route, Location::Params)
    .into_iter()
    .map(|(name, rules)| {
      json!({
        "name": name,
        "in": "path",
        "description": format!("The {} of the product", name),
        "required": true,
        "schema": { "type": schema_type(&rules) },
      })
    })
    .collect()
}

fn request_body(route: &RouteDef) -> Option<Value> {
  let fields = fields_at(route, Location::Body);
  if fields.is_empty() {
    return None;
  }
  let mut properties = Map::new();
  let mut required = Vec::new();
  for (name, rules) in &fields {
    properties.insert(name.to_string(), json!({ "type": schema_type(rules) }));
    if is_required(rules) {
      required.push(Value::String(name.to_string()));
    }
  }
  Some(json!({
    "required": true,
    "content": {
      "application/json": {
        "schema": { "type": "object", "properties": properties, "required": required }
      }
    }
  }))
}

fn payload_schema(payload: DocPayload) -> Value {
  let product = json!({ "$ref": "#/components/schemas/Product" });
  match payload {
    DocPayload::Product => json!({ "type": "object", "properties": { "data": product } }),
    DocPayload::ProductList => json!({
      "type": "object",
      "properties": { "data": { "type": "array", "items": product } }
    }),
    DocPayload::Message => json!({ "type": "object", "properties": { "data": { "type": "string" } } }),
    DocPayload::ValidationErrors => json!({ "$ref": "#/components/schemas/ValidationErrors" }),
    DocPayload::Error => json!({ "$ref": "#/components/schemas/Error" }),
  }
}

fn operation(route: &RouteDef) -> Value {
  let mut responses = Map::new();
  for response in &route.doc.responses {
    responses.insert(
      response.status.to_string(),
      json!({
        "description": response.description,
        "content": { "application/json": { "schema": payload_schema(response.payload) } }
      }),
    );
  }

  let mut op = json!({
    "tags": [TAG],
    "operationId": route.doc.operation_id,
    "summary": route.doc.summary,
    "description": route.doc.description,
    "responses": responses,
  });
  let params = parameters(route);
  if !params.is_empty() {
    op["parameters"] = Value::Array(params);
  }
  if let Some(body) = request_body(route) {
    op["requestBody"] = body;
  }
  op
}

fn components() -> Value {
  json!({
    "schemas": {
      "Product": {
        "type": "object",
        "properties": {
          "id": { "type": "integer", "description": "The Product ID", "example": 1 },
          "name": { "type": "string", "description": "The Product name", "example": "Monitor Curvo de 49 Pulgadas" },
          "price": { "type": "number", "description": "The Product price", "example": 300 },
          "availability": { "type": "boolean", "description": "The Product availability", "example": true }
        }
      },
      "ValidationErrors": {
        "type": "object",
        "properties": {
          "errors": {
            "type": "array",
            "items": {
              "type": "object",
              "properties": {
                "field": { "type": "string" },
                "location": { "type": "string", "enum": ["params", "body"] },
                "message": { "type": "string" }
              }
            }
          }
        }
      },
      "Error": {
        "type": "object",
        "properties": { "error": { "type": "string" } }
      }
    }
  })
}

/// Builds the OpenAPI 3.0 document for every route in `table`.
pub fn openapi_document(table: &RouteTable) -> Value {
  let mut paths = Map::new();
  for route in table.routes() {
    let entry = paths
      .entry(table.full_path(route))
      .or_insert_with(|| Value::Object(Map::new()));
    entry[route.method.as_str().to_ascii_lowercase()] = operation(route);
  }

  json!({
    "openapi": OPENAPI_VERSION,
    "info": { "title": API_TITLE, "version": API_VERSION, "description": "API Docs for Products" },
    "tags": [{ "name": TAG, "description": "API operations related to products" }],
    "paths": paths,
    "components": components(),
  })
}

fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#x27;")
}

/// Swagger UI page loading the bundle from a CDN and the document from `spec_url`.
pub fn swagger_html(title: &str, spec_url: &str) -> String {
  format!(
    r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
  <script>
    window.onload = function() {{
      window.ui = SwaggerUIBundle({{
        url: "{spec_url}",
        dom_id: "#swagger-ui",
        deepLinking: true,
        docExpansion: "list",
        displayRequestDuration: true,
        presets: [SwaggerUIBundle.presets.apis]
      }});
    }};
  </script>
</body>
</html>"##,
    title = html_escape(title),
    version = SWAGGER_UI_VERSION,
    spec_url = html_escape(spec_url),
  )
}

/// Serves `/docs` and `/docs/openapi.json`. Neither touches the store.
pub fn configure_docs(cfg: &mut web::ServiceConfig, table: &RouteTable) {
  let document = Arc::new(openapi_document(table));
  let spec_url = format!("{}/openapi.json", DOCS_PATH);
  let html = Arc::new(swagger_html(&format!("{} - Swagger UI", API_TITLE), &spec_url));

  cfg
    .route(
      &spec_url,
      web::get().to(move || {
        let document = Arc::clone(&document);
        async move { HttpResponse::Ok().json(document.as_ref()) }
      }),
    )
    .route(
      DOCS_PATH,
      web::get().to(move || {
        let html = Arc::clone(&html);
        async move {
          HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html.as_str().to_owned())
        }
      }),
    );
}
