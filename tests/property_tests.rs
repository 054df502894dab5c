//! Property-based tests for trace_logger_system using proptest

use proptest::prelude::*;
use std::sync::Arc;
use trace_logger_system::prelude::*;
use trace_logger_system::JsonEncoder;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Panic),
        Just(LogLevel::Fatal),
    ]
}

fn configurable_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

fn writable_level() -> impl Strategy<Value = LogLevel> {
    configurable_level()
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Configurable level names parse regardless of case and padding
    #[test]
    fn test_level_parse_ignores_case_and_whitespace(
        level in configurable_level(),
        upper in any::<bool>(),
        left in " {0,3}",
        right in "[ \t]{0,3}",
    ) {
        let name = if upper {
            level.as_config_str().to_uppercase()
        } else {
            level.as_config_str().to_string()
        };
        let parsed: LogLevel = format!("{}{}{}", left, name, right).parse().unwrap();
        prop_assert_eq!(parsed, level);
    }

    /// Strings outside the accepted vocabulary are rejected
    #[test]
    fn test_unknown_level_rejected(word in "[a-z]{1,10}") {
        prop_assume!(!["debug", "info", "warn", "warning", "error"].contains(&word.as_str()));
        prop_assert!(word.parse::<LogLevel>().is_err());
    }

    /// LogLevel ordering follows the numeric representation
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        prop_assert_eq!(level1 <= level2, (level1 as u8) <= (level2 as u8));
        prop_assert_eq!(level1.permits(level2), level2 >= level1);
    }
}

// ============================================================================
// Filtering Tests
// ============================================================================

proptest! {
    /// A group receives a record exactly when the record's level reaches the
    /// group's threshold
    #[test]
    fn test_group_filtering(
        thresholds in prop::collection::vec(configurable_level(), 1..4),
        record in writable_level(),
    ) {
        let mut builder = Logger::builder();
        let mut sinks = Vec::new();
        for threshold in &thresholds {
            let memory = MemoryAppender::new();
            builder = builder.appender(*threshold, memory.clone());
            sinks.push(memory);
        }
        let logger = builder.build();

        logger.log(record, "probe", vec![]);

        for (threshold, sink) in thresholds.iter().zip(&sinks) {
            prop_assert_eq!(sink.lines().len(), usize::from(record >= *threshold));
        }
    }

    /// set_level touches only the addressed slot; out-of-range is a no-op
    #[test]
    fn test_set_level_addresses_one_slot(
        initial in prop::collection::vec(configurable_level(), 1..5),
        index in 0usize..8,
        level in configurable_level(),
    ) {
        let mut builder = Logger::builder();
        for threshold in &initial {
            builder = builder.appender(*threshold, MemoryAppender::new());
        }
        let logger = builder.build();

        let applied = logger.set_level(index, level);

        let mut expected = initial.clone();
        if index < expected.len() {
            expected[index] = level;
        }
        prop_assert_eq!(applied, index < initial.len());
        prop_assert_eq!(logger.levels(), expected);
    }
}

// ============================================================================
// Trace Tests
// ============================================================================

proptest! {
    /// The trace identifier is the final field, after every caller field
    #[test]
    fn test_trace_id_appended_last(
        keys in prop::collection::vec("[a-z]{1,8}", 0..6),
        trace_id in "[A-Za-z0-9-]{1,36}",
    ) {
        let memory = MemoryAppender::new();
        let logger = Arc::new(
            Logger::builder()
                .appender(LogLevel::Debug, memory.clone())
                .encoder(JsonEncoder::new())
                .build(),
        );

        let fields: Vec<Field> = keys
            .iter()
            .filter(|k| k.as_str() != "traceId")
            .enumerate()
            .map(|(i, k)| Field::new(format!("{}_{}", k, i), i))
            .collect();
        logger.with_trace(trace_id.clone()).info("fields", fields);

        let record: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
        let object = record.as_object().unwrap();
        prop_assert_eq!(object.keys().last().unwrap().as_str(), "traceId");
        prop_assert_eq!(object["traceId"].as_str().unwrap(), trace_id.as_str());
    }

    /// Deriving contexts never changes the parent
    #[test]
    fn test_context_derivation_is_persistent(
        bindings in prop::collection::vec(("[a-z]{1,5}", "[a-z0-9]{0,8}"), 1..8),
    ) {
        let mut contexts = vec![PropagationContext::new()];
        for (key, value) in &bindings {
            let next = contexts
                .last()
                .unwrap()
                .with_value(ContextKey::custom(key.clone()), value.clone());
            contexts.push(next);
        }

        for (depth, ctx) in contexts.iter().enumerate() {
            prop_assert_eq!(ctx.depth(), depth);
            if depth > 0 {
                let (key, value) = &bindings[depth - 1];
                prop_assert_eq!(ctx.value(&ContextKey::custom(key.clone())), Some(value.as_str()));
            }
            prop_assert_eq!(ctx.trace_id(), None);
        }
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    /// Every record is exactly one line, whatever the message contains
    #[test]
    fn test_one_record_one_line(message in ".*") {
        let memory = MemoryAppender::new();
        let logger = Logger::builder().appender(LogLevel::Debug, memory.clone()).build();

        logger.warn(&message, vec![Field::new("raw", message.clone())]);

        let contents = memory.contents();
        prop_assert!(contents.ends_with('\n'));
        prop_assert_eq!(contents.matches('\n').count(), 1);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

fn sink_config() -> impl Strategy<Value = SinkConfig> {
    (
        prop::collection::vec(prop_oneof![Just("stdout".to_string()), "[a-z]{1,8}\\.log"], 1..3),
        0u64..500,
        0usize..20,
        0u64..90,
        any::<bool>(),
        configurable_level(),
    )
        .prop_map(|(outputs, size, backups, age, compress, level)| {
            let mut config = SinkConfig::new(level)
                .with_max_size_mb(size)
                .with_max_backups(backups)
                .with_max_age_days(age)
                .with_compression(compress);
            config.outputs = outputs;
            config
        })
}

proptest! {
    /// Serialized configurations parse back to the same value in both formats
    #[test]
    fn test_config_text_roundtrip(sinks in prop::collection::vec(sink_config(), 1..4)) {
        let config = LoggerConfig::new(sinks);

        let json = config.to_json().unwrap();
        prop_assert_eq!(&LoggerConfig::from_json(json.as_bytes()).unwrap(), &config);

        let yaml = config.to_yaml().unwrap();
        prop_assert_eq!(&LoggerConfig::from_yaml(yaml.as_bytes()).unwrap(), &config);
    }
}
