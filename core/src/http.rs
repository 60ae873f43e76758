//! HTTP exchange described as plain data.
//!
//! # Design
//! The call executor builds an `HttpRequest`, hands it to a
//! [`Transport`](crate::Transport), and classifies the `HttpResponse` it gets
//! back. Keeping both sides as owned data means building and parsing never
//! touch the network and can be tested on their own, and a custom transport
//! only has to move these values across the wire.

/// A Conduit request: always a form-encoded `POST` to `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form fields, in the order they are sent.
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    /// First form field named `key`.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Raw body bytes; not necessarily UTF-8.
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(response(299).is_success());
        assert!(!response(199).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
        assert!(!response(500).is_success());
    }

    #[test]
    fn form_value_finds_first_match() {
        let req = HttpRequest {
            url: "http://localhost/api/x".to_string(),
            headers: Vec::new(),
            form: vec![
                ("output".to_string(), "json".to_string()),
                ("output".to_string(), "xml".to_string()),
            ],
        };
        assert_eq!(req.form_value("output"), Some("json"));
        assert_eq!(req.form_value("params"), None);
    }
}
