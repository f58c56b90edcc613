//! Pipeline list - the linear composite of steps
//!
//! A pipeline list owns an ordered sequence of steps and threads one data
//! record through it, strictly sequentially: each step's input is the
//! previous step's output. The list implements [`Transform`] itself, which
//! is what lets lists nest inside lists.

use crate::core::catalog::Catalog;
use crate::core::config::StepConfig;
use crate::core::error::PipelineError;
use crate::core::record::{self, Record};
use crate::core::step::{Step, Transform};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;

/// Config key holding the ordered step list
pub const PIPELINE_KEY: &str = "pipeline";

/// An ordered, linearly-chained composite of steps.
///
/// The list exclusively owns its steps; dropping the list drops them. The
/// `prev`/`post` links on each step are indexes into this sequence, set
/// once during construction and usable for traversal only.
pub struct PipelineList {
    steps: Vec<Step>,
}

impl PipelineList {
    /// Build a list from a config carrying the required `pipeline` key.
    ///
    /// Steps are built in list order, and adjacent pairs are wired as they
    /// are appended: the first step's `prev` and the last step's `post`
    /// keep the sentinel `None`.
    pub fn from_config(config: &StepConfig, catalog: &Catalog) -> Result<Self> {
        let value = config.params.get(PIPELINE_KEY).ok_or_else(|| {
            PipelineError::MissingRequiredConfig {
                component: config.instance_name().to_string(),
                key: PIPELINE_KEY,
            }
        })?;

        let configs: Vec<StepConfig> = serde_json::from_value(value.clone()).with_context(|| {
            format!(
                "{}: '{}' must be a list of step configs",
                config.instance_name(),
                PIPELINE_KEY
            )
        })?;

        let mut steps = Vec::with_capacity(configs.len());
        for step_config in &configs {
            steps.push(catalog.build_step(step_config)?);
        }

        for i in 1..steps.len() {
            steps[i - 1].set_post(i);
            steps[i].set_prev(i - 1);
        }

        Ok(PipelineList { steps })
    }

    /// The owned steps, in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// A step by its index in the sequence
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of owned steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the list owns no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transform for PipelineList {
    /// Thread one record through every step in order.
    ///
    /// Each step's output becomes the next step's input; a bare output is
    /// promoted to a record first so heterogeneous steps interoperate. The
    /// last step's output is returned as produced, and an empty list hands
    /// the input back unchanged.
    fn forward(&self, data: &Record) -> Result<Value> {
        let mut current = Value::Object(data.clone());
        for step in &self.steps {
            let record = record::wrap(current);
            current = step.invoke(&record)?;
        }
        Ok(current)
    }
}

impl fmt::Debug for PipelineList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(Step::name).collect();
        f.debug_struct("PipelineList").field("steps", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct Append {
        tag: String,
        log: CallLog,
    }

    impl Transform for Append {
        fn forward(&self, data: &Record) -> Result<Value> {
            self.log.lock().unwrap().push(self.tag.clone());
            let mut seq = data
                .get("seq")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            seq.push(json!(self.tag));
            let mut record = data.clone();
            record.insert("seq".to_string(), Value::Array(seq));
            Ok(Value::Object(record))
        }
    }

    struct Scalar;

    impl Transform for Scalar {
        fn forward(&self, _data: &Record) -> Result<Value> {
            Ok(json!(7))
        }
    }

    struct Explode;

    impl Transform for Explode {
        fn forward(&self, _data: &Record) -> Result<Value> {
            anyhow::bail!("boom")
        }
    }

    fn catalog_with(log: &CallLog) -> Catalog {
        let mut catalog = Catalog::new();
        let append_log = log.clone();
        catalog
            .steps
            .register("Append", move |config: &StepConfig, _: &Catalog| {
                let tag = config
                    .params
                    .get("tag")
                    .and_then(Value::as_str)
                    .unwrap_or("?")
                    .to_string();
                Ok(Box::new(Append {
                    tag,
                    log: append_log.clone(),
                }) as Box<dyn Transform>)
            });
        catalog.steps.register("Scalar", |_: &StepConfig, _: &Catalog| {
            Ok(Box::new(Scalar) as Box<dyn Transform>)
        });
        catalog.steps.register("Explode", |_: &StepConfig, _: &Catalog| {
            Ok(Box::new(Explode) as Box<dyn Transform>)
        });
        catalog
    }

    fn append_list(tags: &[&str]) -> StepConfig {
        let steps: Vec<Value> = tags
            .iter()
            .map(|t| json!({ "name": "Append", "label": t, "tag": t }))
            .collect();
        StepConfig::from_json(json!({ "name": "PipelineList", "pipeline": steps })).unwrap()
    }

    #[test]
    fn test_linear_threading_in_config_order() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let step = catalog.build_step(&append_list(&["A", "B", "C"])).unwrap();

        let output = step.invoke(&Record::new()).unwrap();

        assert_eq!(output["seq"], json!(["A", "B", "C"]));
        assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_neighbor_wiring() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let list = PipelineList::from_config(&append_list(&["A", "B", "C"]), &catalog).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.steps()[0].prev(), None);
        assert_eq!(list.steps()[0].post(), Some(1));
        assert_eq!(list.steps()[1].prev(), Some(0));
        assert_eq!(list.steps()[1].post(), Some(2));
        assert_eq!(list.steps()[2].prev(), Some(1));
        assert_eq!(list.steps()[2].post(), None);
        assert_eq!(list.step(1).map(Step::name), Some("B"));
    }

    #[test]
    fn test_bare_output_wrapped_for_next_step() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let config = StepConfig::from_json(json!({
            "name": "PipelineList",
            "pipeline": [
                { "name": "Scalar" },
                { "name": "Append", "tag": "A" }
            ]
        }))
        .unwrap();

        let step = catalog.build_step(&config).unwrap();
        let output = step.invoke(&Record::new()).unwrap();

        // the bare 7 reached Append as {"data": 7}
        assert_eq!(output["data"], json!(7));
        assert_eq!(output["seq"], json!(["A"]));
    }

    #[test]
    fn test_missing_pipeline_key_fails_at_construction() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);

        let err = PipelineList::from_config(&StepConfig::named("PipelineList"), &catalog)
            .unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::MissingRequiredConfig { component, key }) => {
                assert_eq!(component, "PipelineList");
                assert_eq!(*key, "pipeline");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fail_fast_aborts_remaining_steps() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let config = StepConfig::from_json(json!({
            "name": "PipelineList",
            "pipeline": [
                { "name": "Append", "tag": "A" },
                { "name": "Explode", "label": "B" },
                { "name": "Append", "tag": "C" }
            ]
        }))
        .unwrap();

        let step = catalog.build_step(&config).unwrap();
        let err = step.invoke(&Record::new()).unwrap_err();

        // C never ran
        assert_eq!(*log.lock().unwrap(), vec!["A"]);
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::StepExecution { step, .. }) => assert_eq!(step, "B"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_nested_failure_keeps_innermost_attribution() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let config = StepConfig::from_json(json!({
            "name": "PipelineList",
            "label": "outer",
            "pipeline": [
                {
                    "name": "PipelineList",
                    "label": "inner",
                    "pipeline": [ { "name": "Explode", "label": "Boomer" } ]
                }
            ]
        }))
        .unwrap();

        let step = catalog.build_step(&config).unwrap();
        let err = step.invoke(&Record::new()).unwrap_err();

        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::StepExecution { step, .. }) => assert_eq!(step, "Boomer"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_list_returns_input_unchanged() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let config =
            StepConfig::from_json(json!({ "name": "PipelineList", "pipeline": [] })).unwrap();

        let step = catalog.build_step(&config).unwrap();
        let input = record::wrap(json!({ "data": 42 }));
        let output = step.invoke(&input).unwrap();

        assert_eq!(output, json!({ "data": 42 }));
    }

    #[test]
    fn test_nested_list_executes_in_place() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let catalog = catalog_with(&log);
        let config = StepConfig::from_json(json!({
            "name": "PipelineList",
            "pipeline": [
                { "name": "Append", "tag": "A" },
                {
                    "name": "PipelineList",
                    "label": "inner",
                    "pipeline": [
                        { "name": "Append", "tag": "B1" },
                        { "name": "Append", "tag": "B2" }
                    ]
                },
                { "name": "Append", "tag": "C" }
            ]
        }))
        .unwrap();

        let step = catalog.build_step(&config).unwrap();
        let output = step.invoke(&Record::new()).unwrap();

        assert_eq!(output["seq"], json!(["A", "B1", "B2", "C"]));
    }
}
