//! API utilities for frontend-backend communication
//!
//! Базовый адрес API, заголовок авторизации и общие обёртки над `gloo-net`.
//! Все функции возвращают `Result<T, String>`; текст ошибки берётся из тела
//! ответа сервера, если он там есть.

use contracts::domain::common::{Paginated, PaginationMeta};
use contracts::shared::api_error::extract_error_message;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// `API_BASE_URL` при сборке задаёт адрес явно; иначе берётся хост страницы
/// и порт 3000.
pub fn api_base() -> String {
    if let Some(base) = option_env!("API_BASE_URL") {
        return base.trim_end_matches('/').to_string();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Путь со строкой запроса из сериализуемых параметров
pub fn with_query<Q: Serialize>(path: &str, params: &Q) -> Result<String, String> {
    let query = serde_qs::to_string(params)
        .map_err(|e| format!("Failed to encode query: {}", e))?;
    Ok(if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    })
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("Failed to parse response: {}", e))
}

/// Ответ сервера бывает как голым объектом, так и обёрнутым в `{ data: ... }`.
/// Конверт проверяется первым: у профиля компании все поля необязательные,
/// и конверт разобрался бы как пустой профиль.
pub fn decode_body<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            let inner = map.remove("data").unwrap_or(Value::Null);
            match parse(inner) {
                Ok(parsed) => Ok(parsed),
                Err(inner_err) => parse(Value::Object(map)).map_err(|_| inner_err),
            }
        }
        other => parse(other),
    }
}

/// Список приходит массивом, страницей `{ data: [...], pagination }` или
/// страницей внутри конверта
pub fn decode_page<T: DeserializeOwned>(value: Value) -> Result<(Vec<T>, Option<PaginationMeta>), String> {
    let data = value.get("data");
    let (paged, enveloped) = (
        data.is_some_and(Value::is_array),
        data.is_some_and(Value::is_object),
    );
    match value {
        Value::Array(_) => Ok((parse(value)?, None)),
        Value::Object(_) if paged => parse::<Paginated<T>>(value).map(Paginated::into_parts),
        Value::Object(mut map) if enveloped => {
            let inner = map.remove("data").unwrap_or(Value::Null);
            decode_page(inner)
        }
        other => Err(format!("Failed to parse response: unexpected list shape {}", shape(&other))),
    }
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

async fn check(response: Response, action: &str) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body, &format!("Failed to {}: {}", action, status));
    log::error!("{} -> {}: {}", action, status, message);
    Err(message)
}

async fn read_value(response: Response) -> Result<Value, String> {
    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    decode_body(read_value(response).await?)
}

/// GET без разбора тела: для списков, которые разбирает `decode_page`
pub async fn get_value(path: &str, action: &str) -> Result<Value, String> {
    let response = authorized(Request::get(&api_url(path)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    read_value(check(response, action).await?).await
}

pub async fn get_json<T: DeserializeOwned>(path: &str, action: &str) -> Result<T, String> {
    decode_body(get_value(path, action).await?)
}

/// Метод запроса с телом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Post,
    Put,
    Patch,
}

impl Verb {
    fn builder(self, url: &str) -> RequestBuilder {
        match self {
            Verb::Post => Request::post(url),
            Verb::Put => Request::put(url),
            Verb::Patch => Request::patch(url),
        }
    }
}

async fn send_body<B: Serialize>(
    method: Verb,
    path: &str,
    body: &B,
    action: &str,
) -> Result<Response, String> {
    let response = authorized(method.builder(&api_url(path)))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check(response, action).await
}

/// Запрос с телом и разбором ответа
pub async fn send_json<B: Serialize, T: DeserializeOwned>(
    method: Verb,
    path: &str,
    body: &B,
    action: &str,
) -> Result<T, String> {
    read_json(send_body(method, path, body, action).await?).await
}

/// Запрос с телом, ответ не нужен
pub async fn send_no_content<B: Serialize>(
    method: Verb,
    path: &str,
    body: &B,
    action: &str,
) -> Result<(), String> {
    send_body(method, path, body, action).await.map(|_| ())
}

pub async fn delete(path: &str, action: &str) -> Result<(), String> {
    let response = authorized(Request::delete(&api_url(path)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check(response, action).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Params {
        page: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        store_id: Option<String>,
    }

    #[test]
    fn test_decode_plain_and_enveloped() {
        let plain: Item = decode_body(json!({"id": "1"})).unwrap();
        assert_eq!(plain, Item { id: "1".into() });

        let wrapped: Item = decode_body(json!({"success": true, "data": {"id": "2"}})).unwrap();
        assert_eq!(wrapped.id, "2");

        assert!(decode_body::<Item>(json!({"data": {"name": "x"}})).is_err());
        assert!(decode_body::<Item>(json!([1, 2])).is_err());
    }

    #[test]
    fn test_decode_page_shapes() {
        let (items, meta) = decode_page::<Item>(json!([{"id": "1"}])).unwrap();
        assert_eq!(items.len(), 1);
        assert!(meta.is_none());

        let (items, meta) = decode_page::<Item>(json!({
            "data": [{"id": "1"}, {"id": "2"}],
            "pagination": {"page": 1, "limit": 2, "total": 5, "totalPages": 3}
        }))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(meta.map(|m| m.total), Some(5));

        let (items, _) = decode_page::<Item>(json!({
            "success": true,
            "data": {"data": [{"id": "3"}], "pagination": null}
        }))
        .unwrap();
        assert_eq!(items[0].id, "3");

        assert!(decode_page::<Item>(json!({"data": "oops"})).is_err());
        assert!(decode_page::<Item>(json!(null)).is_err());
    }

    #[test]
    fn test_envelope_wins_over_all_default_struct() {
        #[derive(Debug, Deserialize, Default)]
        struct Loose {
            #[serde(default)]
            name: String,
        }
        let loose: Loose = decode_body(json!({"data": {"name": "Corner Shop"}})).unwrap();
        assert_eq!(loose.name, "Corner Shop");

        let missing: Option<Loose> = decode_body(json!({"data": null})).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_with_query() {
        let path = with_query(
            "/api/employees",
            &Params {
                page: 2,
                store_id: Some("s1".into()),
            },
        )
        .unwrap();
        assert_eq!(path, "/api/employees?page=2&storeId=s1");

        #[derive(Serialize)]
        struct Empty {}
        assert_eq!(with_query("/api/x", &Empty {}).unwrap(), "/api/x");
    }
}
