//! JSON envelope shared by the API handlers.

use serde::Serialize;

/// Every JSON success body is `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_payload_under_data() {
        let body = serde_json::to_value(DataResponse::new(vec!["General", "AMC"])).unwrap();
        assert_eq!(body, serde_json::json!({ "data": ["General", "AMC"] }));
    }
}
