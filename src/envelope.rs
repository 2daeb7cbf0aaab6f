use serde::{Deserialize, Serialize};

/// Wraps every successful response payload as `{ "data": ... }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Envelope<T> {
        Envelope { data }
    }
}
