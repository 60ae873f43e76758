/// Full call URL for `method` on `host`: `<host>/api/<method>`.
///
/// A single trailing `/` on `host` is dropped so the result never holds a
/// doubled separator. Scheme, port and query string are left untouched.
pub fn endpoint_url(host: &str, method: &str) -> String {
    let host = host.strip_suffix('/').unwrap_or(host);
    format!("{host}/api/{method}")
}
