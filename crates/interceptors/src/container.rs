//! The per-shard interceptor container.

use dashmap::DashMap;
use shardline_core::ProcessError;
use shardline_network::MessageProcessor;
use std::sync::Arc;

/// Topic-keyed set of interceptors for one shard.
///
/// Built once by the factory and read-only afterwards, so lookups need no
/// external locking.
#[derive(Default)]
pub struct InterceptorsContainer {
    items: DashMap<String, Arc<dyn MessageProcessor>>,
}

impl InterceptorsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the interceptor subscribed to `topic`.
    pub fn get(&self, topic: &str) -> Result<Arc<dyn MessageProcessor>, ProcessError> {
        self.items
            .get(topic)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ProcessError::ContainerKeyNotFound(topic.to_string()))
    }

    /// Register an interceptor for a topic. Duplicate topics are rejected.
    pub fn add(
        &self,
        topic: String,
        interceptor: Arc<dyn MessageProcessor>,
    ) -> Result<(), ProcessError> {
        match self.items.entry(topic) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => Err(
                ProcessError::DuplicateContainerKey(occupied.key().clone()),
            ),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(interceptor);
                Ok(())
            }
        }
    }

    /// Register several interceptors at once. The lists must have equal
    /// length; insertion stops at the first duplicate.
    pub fn add_multiple(
        &self,
        topics: Vec<String>,
        interceptors: Vec<Arc<dyn MessageProcessor>>,
    ) -> Result<(), ProcessError> {
        if topics.len() != interceptors.len() {
            return Err(ProcessError::ContainerLenMismatch {
                topics: topics.len(),
                interceptors: interceptors.len(),
            });
        }
        for (topic, interceptor) in topics.into_iter().zip(interceptors) {
            self.add(topic, interceptor)?;
        }
        Ok(())
    }

    /// Swap the interceptor registered for an existing topic.
    pub fn replace(
        &self,
        topic: &str,
        interceptor: Arc<dyn MessageProcessor>,
    ) -> Result<(), ProcessError> {
        match self.items.get_mut(topic) {
            Some(mut entry) => {
                *entry.value_mut() = interceptor;
                Ok(())
            }
            None => Err(ProcessError::ContainerKeyNotFound(topic.to_string())),
        }
    }

    /// Drop a topic's interceptor if present.
    pub fn remove(&self, topic: &str) {
        self.items.remove(topic);
    }

    /// Number of registered topics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardline_network::InboundMessage;

    struct NoopProcessor;

    impl MessageProcessor for NoopProcessor {
        fn process_received_message(&self, _message: &InboundMessage) -> Result<(), ProcessError> {
            Ok(())
        }
    }

    fn noop() -> Arc<dyn MessageProcessor> {
        Arc::new(NoopProcessor)
    }

    #[test]
    fn test_add_then_get() {
        let container = InterceptorsContainer::new();
        container.add("transactions_0".to_string(), noop()).unwrap();
        assert!(container.get("transactions_0").is_ok());
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let container = InterceptorsContainer::new();
        container.add("t".to_string(), noop()).unwrap();
        let err = container.add("t".to_string(), noop()).unwrap_err();
        assert_eq!(err, ProcessError::DuplicateContainerKey("t".to_string()));
    }

    #[test]
    fn test_get_missing() {
        let container = InterceptorsContainer::new();
        let err = match container.get("absent") {
            Err(e) => e,
            Ok(_) => panic!("expected error"),
        };
        assert_eq!(err, ProcessError::ContainerKeyNotFound("absent".to_string()));
    }

    #[test]
    fn test_add_multiple_length_mismatch() {
        let container = InterceptorsContainer::new();
        let err = container
            .add_multiple(vec!["a".to_string(), "b".to_string()], vec![noop()])
            .unwrap_err();
        assert_eq!(
            err,
            ProcessError::ContainerLenMismatch {
                topics: 2,
                interceptors: 1
            }
        );
    }

    #[test]
    fn test_replace_and_remove() {
        let container = InterceptorsContainer::new();
        assert!(container.replace("t", noop()).is_err());

        container.add("t".to_string(), noop()).unwrap();
        container.replace("t", noop()).unwrap();
        assert_eq!(container.len(), 1);

        container.remove("t");
        assert!(container.is_empty());
        // Removing an absent topic is a no-op.
        container.remove("t");
    }
}
