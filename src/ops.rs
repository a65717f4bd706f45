//! Typed convenience operations on top of [`ScriptExecutor`]
//!
//! Each operation validates its inputs, passes them as `params` (never by
//! splicing into script text), and deserializes the result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};
use crate::script::ScriptExecutor;

/// Host limits for composition dimensions, in pixels
const MIN_COMP_SIZE: u32 = 4;
const MAX_COMP_SIZE: u32 = 30_000;
const MAX_FRAME_RATE: f64 = 999.0;

const PROJECT_INFO_SCRIPT: &str = r#"
var project = app.project;
var result = {
    name: project.file ? project.file.name : "Untitled Project",
    path: project.file ? project.file.fsName : "",
    numItems: project.numItems,
    activeItem: project.activeItem ? project.activeItem.name : null,
    compositions: []
};
for (var i = 1; i <= project.numItems; i++) {
    var item = project.item(i);
    if (item instanceof CompItem) {
        result.compositions.push({
            name: item.name,
            id: item.id,
            duration: item.duration,
            width: item.width,
            height: item.height,
            frameRate: item.frameRate
        });
    }
}
return result;
"#;

const CREATE_COMPOSITION_SCRIPT: &str = r#"
var comp = app.project.items.addComp(
    params.name, params.width, params.height, 1, params.duration, params.frameRate
);
return {
    name: comp.name,
    id: comp.id,
    duration: comp.duration,
    width: comp.width,
    height: comp.height,
    frameRate: comp.frameRate
};
"#;

const ADD_SOLID_LAYER_SCRIPT: &str = r#"
var comp = null;
for (var i = 1; i <= app.project.numItems; i++) {
    var item = app.project.item(i);
    if (item instanceof CompItem && item.name === params.compositionName) {
        comp = item;
        break;
    }
}
if (!comp) {
    throw new Error("Composition not found: " + params.compositionName);
}
var width = params.width || comp.width;
var height = params.height || comp.height;
var layer = comp.layers.addSolid(params.color, params.layerName, width, height, 1, comp.duration);
layer.threeDLayer = params.is3d;
return {
    name: layer.name,
    index: layer.index,
    width: width,
    height: height,
    is3d: layer.threeDLayer
};
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDetails {
    pub name: String,
    pub id: i64,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub num_items: u32,
    #[serde(default)]
    pub active_item: Option<String>,
    #[serde(default)]
    pub compositions: Vec<CompositionDetails>,
}

/// Inputs for [`create_composition`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComposition {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Seconds
    pub duration: f64,
    pub frame_rate: f64,
}

impl NewComposition {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BridgeError::invalid_params("name must not be empty"));
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_COMP_SIZE..=MAX_COMP_SIZE).contains(&value) {
                return Err(BridgeError::invalid_params(format!(
                    "{} must be between {} and {}, got {}",
                    field, MIN_COMP_SIZE, MAX_COMP_SIZE, value
                )));
            }
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(BridgeError::invalid_params("duration must be a positive number"));
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0 && self.frame_rate <= MAX_FRAME_RATE)
        {
            return Err(BridgeError::invalid_params(format!(
                "frame_rate must be in (0, {}]",
                MAX_FRAME_RATE
            )));
        }
        Ok(())
    }
}

/// Inputs for [`add_solid_layer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSolidLayer {
    pub composition_name: String,
    pub layer_name: String,
    /// RGB, each channel in `0.0..=1.0`
    pub color: [f64; 3],
    /// Defaults to the composition width
    #[serde(default)]
    pub width: Option<u32>,
    /// Defaults to the composition height
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub is3d: bool,
}

impl NewSolidLayer {
    pub fn validate(&self) -> Result<()> {
        if self.composition_name.trim().is_empty() {
            return Err(BridgeError::invalid_params("composition_name must not be empty"));
        }
        if self.layer_name.trim().is_empty() {
            return Err(BridgeError::invalid_params("layer_name must not be empty"));
        }
        for (channel, value) in ["red", "green", "blue"].iter().zip(self.color) {
            if !(0.0..=1.0).contains(&value) {
                return Err(BridgeError::invalid_params(format!(
                    "{} color value must be between 0 and 1, got {}",
                    channel, value
                )));
            }
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if let Some(value) = value {
                if !(MIN_COMP_SIZE..=MAX_COMP_SIZE).contains(&value) {
                    return Err(BridgeError::invalid_params(format!(
                        "{} must be between {} and {}, got {}",
                        field, MIN_COMP_SIZE, MAX_COMP_SIZE, value
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidLayerDetails {
    pub name: String,
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub is3d: bool,
}

pub fn project_info(executor: &ScriptExecutor) -> Result<ProjectInfo> {
    executor.execute_as(PROJECT_INFO_SCRIPT)
}

pub fn create_composition(
    executor: &ScriptExecutor,
    input: &NewComposition,
) -> Result<CompositionDetails> {
    input.validate()?;
    executor.execute_with_params_as(CREATE_COMPOSITION_SCRIPT, &to_params(input)?)
}

pub fn add_solid_layer(
    executor: &ScriptExecutor,
    input: &NewSolidLayer,
) -> Result<SolidLayerDetails> {
    input.validate()?;
    executor.execute_with_params_as(ADD_SOLID_LAYER_SCRIPT, &to_params(input)?)
}

fn to_params<T: Serialize>(input: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(input) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(BridgeError::invalid_params(format!(
            "expected an object of params, got {}",
            other
        ))),
        Err(e) => Err(BridgeError::decode("failed to serialize params", e)),
    }
}
