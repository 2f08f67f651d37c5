//! Per-request state passed through the handlers.
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::codec::CodecService;
use crate::handler::HandlerError;
use crate::request::Request;
use crate::response::ResponseWriter;

/// Reserved data key under which a failed request's error is stored.
pub const ERROR_KEY: &str = "error";

/// Everything a handler knows about the request it is working on. A context
/// lives exactly as long as one request's trip through the handlers.
pub struct Context<'a> {
    request: Request,
    response: &'a mut dyn ResponseWriter,
    codec_service: Arc<dyn CodecService>,
    data: Data,
}

impl<'a> Context<'a> {
    pub fn new(
        request: Request,
        response: &'a mut dyn ResponseWriter,
        codec_service: Arc<dyn CodecService>,
    ) -> Self {
        Self {
            request,
            response,
            codec_service,
            data: Data::default(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn response(&mut self) -> &mut (dyn ResponseWriter + 'a) {
        &mut *self.response
    }

    pub fn codec_service(&self) -> &dyn CodecService {
        self.codec_service.as_ref()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Data {
        &mut self.data
    }

    /// Decode the request body with the codec service. `None` if the request
    /// has no body.
    pub fn read_value(&self) -> Result<Option<Value>, HandlerError> {
        match &self.request.body {
            Some(body) => Ok(Some(self.codec_service.unmarshal(body)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` with the codec service and write it as the response.
    pub fn write_value(&mut self, status_code: u16, value: &Value) -> Result<(), HandlerError> {
        let body = self.codec_service.marshal(value)?;
        self.response.set_status(status_code);
        self.response
            .set_header("Content-Type", self.codec_service.content_type());
        self.response.write_all(&body)?;
        Ok(())
    }
}

/// Scratch space shared by the handlers of one request.
///
/// Values are JSON values; typed access goes through serde with
/// [`get_as`](Data::get_as) and [`set_from`](Data::set_from). The error of a
/// failed request is kept in its own slot and is the only thing stored under
/// [`ERROR_KEY`], where [`get`](Data::get) sees it as
/// `{"reason": ..., "status_code": ...}`.
#[derive(Debug, Default)]
pub struct Data {
    error: Option<HandlerError>,
    values: HashMap<String, Value>,
}

impl Data {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store `value` under `key` and return the previous value. Fails for
    /// the reserved [`ERROR_KEY`], use [`set_error`](Data::set_error).
    pub fn set<V>(&mut self, key: &str, value: V) -> Result<Option<Value>, HandlerError>
    where
        V: Into<Value>,
    {
        if key == ERROR_KEY {
            return Err(HandlerError::new(&format!("data key '{}' is reserved", key)));
        }
        Ok(self.values.insert(key.to_string(), value.into()))
    }

    /// Remove `key`. Removing [`ERROR_KEY`] also clears the error slot.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if key == ERROR_KEY {
            self.error = None;
        }
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        if key == ERROR_KEY {
            self.error.is_some()
        } else {
            self.values.contains_key(key)
        }
    }

    pub fn get_as<T>(&self, key: &str) -> Result<Option<T>, HandlerError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.values.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn set_from<T>(&mut self, key: &str, value: &T) -> Result<Option<Value>, HandlerError>
    where
        T: serde::Serialize,
    {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }

    pub fn error(&self) -> Option<&HandlerError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: HandlerError) -> Option<HandlerError> {
        let value = serde_json::json!({
            "reason": error.reason(),
            "status_code": error.status_code(),
        });
        self.values.insert(ERROR_KEY.to_string(), value);
        self.error.replace(error)
    }

    pub fn take_error(&mut self) -> Option<HandlerError> {
        self.values.remove(ERROR_KEY);
        self.error.take()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::json::JsonCodecService;
    use crate::request::Method;
    use crate::response::Response;
    use serde_json::json;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Session {
        user: String,
        admin: bool,
    }

    #[test]
    fn test_data_values() {
        let mut data = Data::default();
        assert_eq!(data.set("count", 1).unwrap(), None);
        assert_eq!(data.set("count", 2).unwrap(), Some(json!(1)));
        assert_eq!(data.get("count"), Some(&json!(2)));
        assert!(data.contains_key("count"));
        assert_eq!(data.remove("count"), Some(json!(2)));
        assert!(!data.contains_key("count"));
    }

    #[test]
    fn test_data_typed_values() {
        let mut data = Data::default();
        let session = Session {
            user: "bob".to_string(),
            admin: false,
        };
        data.set_from("session", &session).unwrap();
        assert_eq!(data.get_as::<Session>("session").unwrap(), Some(session));
        assert_eq!(data.get_as::<Session>("missing").unwrap(), None);
        assert!(data.get_as::<u32>("session").is_err());
    }

    #[test]
    fn test_error_key_is_reserved() {
        let mut data = Data::default();
        assert!(data.set(ERROR_KEY, "nope").is_err());
        assert!(!data.contains_key(ERROR_KEY));

        data.set_error(HandlerError::new("boom"));
        assert!(data.contains_key(ERROR_KEY));
        assert_eq!(data.error().map(|e| e.to_string()), Some("boom".to_string()));
        assert_eq!(data.take_error().map(|e| e.to_string()), Some("boom".to_string()));
        assert!(data.error().is_none());
        assert_eq!(data.get(ERROR_KEY), None);
    }

    #[test]
    fn test_error_key_mirrors_error() {
        let mut data = Data::default();
        data.set_error(HandlerError::new("gone").with_status(410));
        assert_eq!(
            data.get(ERROR_KEY),
            Some(&json!({"reason": "gone", "status_code": 410}))
        );

        data.set_error(HandlerError::new("boom"));
        assert_eq!(
            data.get(ERROR_KEY),
            Some(&json!({"reason": "boom", "status_code": null}))
        );
        assert!(data.set(ERROR_KEY, "nope").is_err());

        assert_eq!(
            data.remove(ERROR_KEY),
            Some(json!({"reason": "boom", "status_code": null}))
        );
        assert!(data.error().is_none());
        assert!(!data.contains_key(ERROR_KEY));
    }

    #[test]
    fn test_read_and_write_value() {
        let mut response = Response::default();
        let request = Request::new(Method::POST, "/echo").with_body(b"{\"a\":[1,2]}".to_vec());
        let mut context = Context::new(request, &mut response, Arc::new(JsonCodecService::new()));

        let value = context.read_value().unwrap().unwrap();
        assert_eq!(value, json!({"a": [1, 2]}));
        context.write_value(201, &value).unwrap();

        assert_eq!(response.status_code, 201);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body(), b"{\"a\":[1,2]}");
    }

    #[test]
    fn test_read_value_without_body() {
        let mut response = Response::default();
        let context = Context::new(
            Request::default(),
            &mut response,
            Arc::new(JsonCodecService::new()),
        );
        assert_eq!(context.read_value().unwrap(), None);
    }
}
