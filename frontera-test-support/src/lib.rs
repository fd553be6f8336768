//! Shared test utilities used across frontera crates.

pub mod ci;

pub mod tracing {
    //! A `tracing` layer that keeps closed spans and emitted events for
    //! assertions.
    use std::{
        collections::BTreeMap,
        fmt,
        sync::{Arc, Mutex, PoisonError},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };
    use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

    /// Field values keyed by field name. Strings are stored unquoted and all
    /// other values through their `Debug` form.
    pub type Fields = BTreeMap<String, String>;

    /// Layer that records closed spans in closing order and events in
    /// emission order. Clones share the same storage, so a clone can be
    /// installed while the original is kept for assertions.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    /// A span that has closed.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from its metadata.
        pub name: String,
        /// Fields given at creation plus any recorded later.
        pub fields: Fields,
    }

    /// An emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// Event fields, including `message`.
        pub fields: Fields,
    }

    impl EventRecord {
        /// The event's `message` field, if any.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    impl RecordingLayer {
        /// Closed spans recorded so far.
        ///
        /// # Examples
        /// ```
        /// use frontera_test_support::tracing::RecordingLayer;
        ///
        /// let layer = RecordingLayer::default();
        /// assert!(layer.spans().is_empty());
        /// ```
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.spans.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// Events recorded so far.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// Closed spans called `name`, in closing order.
        #[must_use]
        pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
            self.spans().into_iter().filter(|span| span.name == name).collect()
        }

        /// Events whose message is exactly `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
            self.events()
                .into_iter()
                .filter(|event| event.message() == Some(message))
                .collect()
        }
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut record = SpanRecord {
                name: attrs.metadata().name().to_owned(),
                fields: Fields::new(),
            };
            attrs.record(&mut Collect(&mut record.fields));
            span.extensions_mut().insert(record);
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id)
                && let Some(record) = span.extensions_mut().get_mut::<SpanRecord>()
            {
                values.record(&mut Collect(&mut record.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let Some(record) = ctx
                .span(&id)
                .and_then(|span| span.extensions_mut().remove::<SpanRecord>())
            else {
                return;
            };
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record);
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut Collect(&mut fields));
            let metadata = event.metadata();
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(EventRecord {
                    level: *metadata.level(),
                    target: metadata.target().to_owned(),
                    fields,
                });
        }
    }

    struct Collect<'a>(&'a mut Fields);

    impl Visit for Collect<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

}

pub mod graphs {
    //! Small graphs with published results, as plain edge lists.

    /// Zachary's karate club, 0-based, one entry per undirected edge.
    #[rustfmt::skip]
    pub const KARATE_EDGES: &[(usize, usize)] = &[
        (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 10), (0, 11),
        (0, 12), (0, 13), (0, 17), (0, 19), (0, 21), (0, 31), (1, 2), (1, 3), (1, 7), (1, 13),
        (1, 17), (1, 19), (1, 21), (1, 30), (2, 3), (2, 7), (2, 8), (2, 9), (2, 13), (2, 27),
        (2, 28), (2, 32), (3, 7), (3, 12), (3, 13), (4, 6), (4, 10), (5, 6), (5, 10), (5, 16),
        (6, 16), (8, 30), (8, 32), (8, 33), (9, 33), (13, 33), (14, 32), (14, 33), (15, 32),
        (15, 33), (18, 32), (18, 33), (19, 33), (20, 32), (20, 33), (22, 32), (22, 33),
        (23, 25), (23, 27), (23, 29), (23, 32), (23, 33), (24, 25), (24, 27), (24, 31),
        (25, 31), (26, 29), (26, 33), (27, 33), (28, 31), (28, 33), (29, 32), (29, 33),
        (30, 32), (30, 33), (31, 32), (31, 33), (32, 33),
    ];

    /// Number of vertices in [`KARATE_EDGES`].
    pub const KARATE_VERTICES: usize = 34;

    /// Both directions of every edge, with unit weights.
    #[must_use]
    pub fn symmetric_triplets(edges: &[(usize, usize)]) -> Vec<(usize, usize, f64)> {
        edges
            .iter()
            .flat_map(|&(u, v)| [(u, v, 1.0), (v, u, 1.0)])
            .collect()
    }

    /// The karate club as a Matrix Market document with symmetric pattern
    /// storage, 1-based.
    #[must_use]
    pub fn karate_matrix_market() -> String {
        let mut text = format!(
            "%%MatrixMarket matrix coordinate pattern symmetric\n% Zachary's karate club\n{KARATE_VERTICES} {KARATE_VERTICES} {}\n",
            KARATE_EDGES.len()
        );
        for &(u, v) in KARATE_EDGES {
            // Lower triangle: row index at least the column index.
            text.push_str(&format!("{} {}\n", u.max(v) + 1, u.min(v) + 1));
        }
        text
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn karate_has_seventy_eight_edges() {
            assert_eq!(KARATE_EDGES.len(), 78);
            assert!(KARATE_EDGES.iter().all(|&(u, v)| u < v && v < KARATE_VERTICES));
            assert_eq!(symmetric_triplets(KARATE_EDGES).len(), 156);
        }

        #[test]
        fn karate_document_lists_one_line_per_edge() {
            let text = karate_matrix_market();
            assert_eq!(text.lines().count(), 3 + 78);
            assert!(text.ends_with("34 33\n"));
        }
    }
}
