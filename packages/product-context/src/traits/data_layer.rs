use serde_json::Value;

/// Analytics data layer events are pushed to.
pub trait DataLayer: Send + Sync {
    fn push(&self, events: Vec<Value>);
}

impl<T: DataLayer + ?Sized> DataLayer for std::sync::Arc<T> {
    fn push(&self, events: Vec<Value>) {
        (**self).push(events)
    }
}
