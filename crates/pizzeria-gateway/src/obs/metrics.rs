//! Counter/gauge families with dynamic labels backed by `DashMap`.
//!
//! Labels are flattened into sorted key vectors so the same label set always
//! maps to the same series regardless of argument order.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn write_series(out: &mut String, name: &str, key: &LabelKey, val: impl std::fmt::Display) {
    if key.is_empty() {
        let _ = writeln!(out, "{name} {val}");
        return;
    }
    let labels = key
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "{name}{{{labels}}} {val}");
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            write_series(out, name, r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge");
        for r in self.map.iter() {
            write_series(out, name, r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    pub scopes_opened: CounterVec,
    pub scopes_rejected: CounterVec,
    pub scopes_active: GaugeVec,
    pub pizzas_sold: CounterVec,
    pub decode_errors: CounterVec,
    pub service_errors: CounterVec,
    draining: AtomicBool,
}

impl GatewayMetrics {
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.scopes_opened.render("pizzeria_scopes_opened_total", &mut out);
        self.scopes_rejected.render("pizzeria_scopes_rejected_total", &mut out);
        self.scopes_active.render("pizzeria_scopes_active", &mut out);
        self.pizzas_sold.render("pizzeria_pizzas_sold_total", &mut out);
        self.decode_errors.render("pizzeria_decode_errors_total", &mut out);
        self.service_errors.render("pizzeria_service_errors_total", &mut out);

        let _ = writeln!(
            out,
            "# TYPE pizzeria_draining gauge\npizzeria_draining {}",
            u8::from(self.is_draining())
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_does_not_split_series() {
        let c = CounterVec::default();
        c.inc(&[("svc", "pizza"), ("code", "BAD_REQUEST")]);
        c.inc(&[("code", "BAD_REQUEST"), ("svc", "pizza")]);
        assert_eq!(c.get(&[("svc", "pizza"), ("code", "BAD_REQUEST")]), 2);
    }

    #[test]
    fn render_includes_series_and_draining() {
        let m = GatewayMetrics::default();
        m.pizzas_sold.add(&[], 3);
        m.scopes_active.inc(&[]);
        m.scopes_active.inc(&[]);
        m.scopes_active.dec(&[]);
        m.service_errors.inc(&[("svc", "pi\"zza")]);
        m.set_draining();

        let out = m.render();
        assert!(out.contains("# TYPE pizzeria_pizzas_sold_total counter"));
        assert!(out.contains("pizzeria_pizzas_sold_total 3"));
        assert!(out.contains("pizzeria_scopes_active 1"));
        assert!(out.contains("pizzeria_service_errors_total{svc=\"pi\\\"zza\"} 1"));
        assert!(out.contains("pizzeria_draining 1"));

        // every series line belongs to a family announced by a TYPE line
        for line in out.lines().filter(|l| !l.starts_with('#')) {
            let name = line.split(['{', ' ']).next().unwrap_or_default();
            assert!(out.contains(&format!("# TYPE {name} ")), "untyped series: {line}");
        }
    }
}
