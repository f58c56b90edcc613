//! Sample step kinds

use crate::core::catalog::Catalog;
use crate::core::config::StepConfig;
use crate::core::record::Record;
use crate::core::step::Transform;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Register the sample step kinds
pub fn install(catalog: &mut Catalog) {
    catalog.steps.register("Echo", |_: &StepConfig, _: &Catalog| {
        Ok(Box::new(EchoStep) as Box<dyn Transform>)
    });
    catalog.steps.register("Set", |config: &StepConfig, _: &Catalog| {
        Ok(Box::new(SetStep::from_config(config)?) as Box<dyn Transform>)
    });
    catalog.steps.register("Fail", |config: &StepConfig, _: &Catalog| {
        Ok(Box::new(FailStep::from_config(config)) as Box<dyn Transform>)
    });
}

/// Returns its input record unchanged
pub struct EchoStep;

impl Transform for EchoStep {
    fn forward(&self, data: &Record) -> Result<Value> {
        Ok(Value::Object(data.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct SetParams {
    field: String,
    value: Value,
}

/// Writes a configured value into one field of the record
pub struct SetStep {
    field: String,
    value: Value,
}

impl SetStep {
    pub fn from_config(config: &StepConfig) -> Result<Self> {
        let params: SetParams = serde_json::from_value(Value::Object(config.params.clone()))
            .context("Set step needs 'field' and 'value'")?;
        Ok(SetStep {
            field: params.field,
            value: params.value,
        })
    }
}

impl Transform for SetStep {
    fn forward(&self, data: &Record) -> Result<Value> {
        let mut record = data.clone();
        record.insert(self.field.clone(), self.value.clone());
        Ok(Value::Object(record))
    }
}

/// Always fails; handy for exercising abort behavior in larger pipelines
pub struct FailStep {
    message: String,
}

impl FailStep {
    pub fn from_config(config: &StepConfig) -> Self {
        let message = config
            .params
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Fail step invoked")
            .to_string();
        FailStep { message }
    }
}

impl Transform for FailStep {
    fn forward(&self, _data: &Record) -> Result<Value> {
        anyhow::bail!("{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record;
    use serde_json::json;

    #[test]
    fn test_echo_returns_input() {
        let input = record::wrap(json!({ "data": 42 }));
        let output = EchoStep.forward(&input).unwrap();
        assert_eq!(output, json!({ "data": 42 }));
    }

    #[test]
    fn test_set_writes_field() {
        let config =
            StepConfig::from_json(json!({ "name": "Set", "field": "tag", "value": "done" }))
                .unwrap();
        let step = SetStep::from_config(&config).unwrap();

        let output = step.forward(&record::wrap(json!({ "data": 1 }))).unwrap();
        assert_eq!(output, json!({ "data": 1, "tag": "done" }));
    }

    #[test]
    fn test_set_without_field_fails_at_construction() {
        let config = StepConfig::from_json(json!({ "name": "Set", "value": 1 })).unwrap();
        assert!(SetStep::from_config(&config).is_err());
    }

    #[test]
    fn test_fail_reports_configured_message() {
        let config =
            StepConfig::from_json(json!({ "name": "Fail", "message": "wired to fail" })).unwrap();
        let step = FailStep::from_config(&config);

        let err = step.forward(&Record::new()).unwrap_err();
        assert!(err.to_string().contains("wired to fail"));
    }
}
