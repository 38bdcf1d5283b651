use std::sync::{Arc, Mutex};
use std::time::Duration;

use kafka::producer::{Producer, Record, RequiredAcks};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::shared::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
  Created,
  Deleted,
}

/// Topic names per event type. Both may name the same topic, the payload
/// carries its own [`EventType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTopics {
  pub created: String,
  pub deleted: String,
}

impl EventTopics {
  pub fn topic(&self, event_type: EventType) -> &str {
    match event_type {
      EventType::Created => &self.created,
      EventType::Deleted => &self.deleted,
    }
  }
}

impl From<&Config> for EventTopics {
  fn from(config: &Config) -> Self {
    Self {
      created: config.user_created_topic.clone(),
      deleted: config.user_deleted_topic.clone(),
    }
  }
}

/// Fire-and-forget publishing. Failures are logged by the implementation and
/// never reach the caller.
pub trait EventPublisher {
  fn publish<P: Serialize>(&self, topic: &str, key: &str, payload: &P);
}

#[derive(Clone)]
pub struct KafkaEventPublisher {
  producer: Arc<Mutex<Producer>>,
}

impl KafkaEventPublisher {
  pub fn connect(hosts: Vec<String>) -> Result<Self, kafka::Error> {
    let producer = Producer::from_hosts(hosts)
      .with_ack_timeout(Duration::from_secs(1))
      .with_required_acks(RequiredAcks::One)
      .create()?;
    Ok(Self {
      producer: Arc::new(Mutex::new(producer)),
    })
  }
}

impl EventPublisher for KafkaEventPublisher {
  fn publish<P: Serialize>(&self, topic: &str, key: &str, payload: &P) {
    let body = match serde_json::to_string(payload) {
      Ok(body) => body,
      Err(error) => {
        warn!("Failed to serialize event for user {}: {}", key, error);
        return;
      }
    };
    let producer = Arc::clone(&self.producer);
    let topic = topic.to_string();
    let key = key.to_string();

    // The kafka producer blocks until the broker acknowledges.
    actix_web::rt::task::spawn_blocking(move || {
      let sent = match producer.lock() {
        Ok(mut producer) => producer
          .send(&Record::from_key_value(&topic, key.as_str(), body.as_str()))
          .map_err(|error| error.to_string()),
        Err(_) => Err(String::from("producer lock poisoned")),
      };
      match sent {
        Ok(()) => info!("Sent event for user {} to topic {}", key, topic),
        Err(error) => warn!("Failed to send event for user {}: {}", key, error),
      }
    });
  }
}

/// Publisher selected at startup from [`Config::kafka_hosts`].
#[derive(Clone)]
pub enum Publisher {
  Kafka(KafkaEventPublisher),
  Disabled,
}

impl Publisher {
  /// Events are optional: a broker that cannot be reached at startup leaves
  /// publishing disabled instead of failing the service.
  pub fn from_config(config: &Config) -> Self {
    if !config.events_enabled() {
      info!("No Kafka hosts configured, user events are disabled");
      return Publisher::Disabled;
    }
    match KafkaEventPublisher::connect(config.kafka_hosts.clone()) {
      Ok(publisher) => {
        info!(
          "Publishing user events to {} / {}",
          config.user_created_topic, config.user_deleted_topic
        );
        Publisher::from(publisher)
      }
      Err(error) => {
        warn!(
          "Kafka at {:?} unavailable, user events are disabled: {}",
          config.kafka_hosts, error
        );
        Publisher::Disabled
      }
    }
  }
}

impl From<KafkaEventPublisher> for Publisher {
  fn from(publisher: KafkaEventPublisher) -> Self {
    Publisher::Kafka(publisher)
  }
}

impl EventPublisher for Publisher {
  fn publish<P: Serialize>(&self, topic: &str, key: &str, payload: &P) {
    match self {
      Publisher::Kafka(kafka) => kafka.publish(topic, key, payload),
      Publisher::Disabled => {
        debug!("Events disabled, dropping event for user {} on {}", key, topic)
      }
    }
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use crate::helpers::tests::test_config;

  #[derive(Debug, Clone, PartialEq)]
  pub struct PublishedEvent {
    pub topic: String,
    pub key: String,
    pub payload: serde_json::Value,
  }

  /// Keeps every published event; clones share the same log.
  #[derive(Clone, Default)]
  pub struct RecordingPublisher {
    pub events: Arc<Mutex<Vec<PublishedEvent>>>,
  }

  impl RecordingPublisher {
    pub fn new() -> Self {
      Self::default()
    }

    pub fn published(&self) -> Vec<PublishedEvent> {
      self.events.lock().unwrap().clone()
    }
  }

  impl EventPublisher for RecordingPublisher {
    fn publish<P: Serialize>(&self, topic: &str, key: &str, payload: &P) {
      self.events.lock().unwrap().push(PublishedEvent {
        topic: topic.to_string(),
        key: key.to_string(),
        payload: serde_json::to_value(payload).unwrap(),
      });
    }
  }

  fn topics() -> EventTopics {
    EventTopics {
      created: "user.created".to_string(),
      deleted: "user.deleted".to_string(),
    }
  }

  #[test]
  fn test_topic_per_event_type() {
    let topics = topics();
    assert_eq!(topics.topic(EventType::Created), "user.created");
    assert_eq!(topics.topic(EventType::Deleted), "user.deleted");
  }

  #[test]
  fn test_event_type_serialization() {
    assert_eq!(
      serde_json::to_string(&EventType::Created).unwrap(),
      "\"CREATED\""
    );
    assert_eq!(
      serde_json::to_string(&EventType::Deleted).unwrap(),
      "\"DELETED\""
    );
  }

  #[test]
  fn test_no_hosts_disables_events() {
    let publisher = Publisher::from_config(&test_config());

    assert!(matches!(publisher, Publisher::Disabled));
  }

  #[test]
  fn test_unreachable_broker_disables_events() {
    let config = Config {
      kafka_hosts: vec![String::from("127.0.0.1:1")],
      ..test_config()
    };

    let publisher = Publisher::from_config(&config);

    assert!(matches!(publisher, Publisher::Disabled));
  }
}
