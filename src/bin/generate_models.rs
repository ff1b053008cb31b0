//! Writes demonstration model artifacts so the predictor can run without
//! trained models. The numbers are hand-picked to give plausible magnitudes
//! (OMC around 10–25 %, MDD around 1.5–2.1 g/cm³); they are not fitted to data.

use serde_json::{json, Value};

const FEATURE_NAMES: [&str; 8] = [
    "Gravel",
    "Sand",
    "Silt",
    "LiquidLimit",
    "PlasticLimit",
    "CompactionEnergy",
    "PlasticityIndex",
    "Clay",
];

/// `feature <= threshold` → `left` leaf, else `right` leaf.
fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Value {
    json!({
        "nodes": [
            { "feature": feature, "threshold": threshold, "left": 1, "right": 2 },
            { "value": left },
            { "value": right }
        ]
    })
}

fn omc_model() -> Value {
    let trees = vec![
        stump(4, 20.0, -2.5, 3.0),
        stump(7, 20.0, -1.5, 1.5),
        stump(5, 600.0, 1.0, -1.2),
        stump(6, 15.0, -0.8, 0.9),
        // Coarse, sandy soils hold less water.
        json!({
            "nodes": [
                { "feature": 0, "threshold": 30.0, "left": 1, "right": 4 },
                { "feature": 1, "threshold": 40.0, "left": 2, "right": 3 },
                { "value": 0.4 },
                { "value": -0.6 },
                { "value": -1.4 }
            ]
        }),
    ];
    json!({
        "target": "OMC",
        "feature_names": FEATURE_NAMES,
        "model": {
            "kind": "gradient_boosting",
            "init": 14.0,
            "learning_rate": 1.0,
            "trees": trees
        }
    })
}

fn mdd_model() -> Value {
    json!({
        "target": "MDD",
        "feature_names": FEATURE_NAMES,
        "model": {
            "kind": "linear",
            "intercept": 1.95,
            "coefficients": [0.002, 0.001, -0.002, -0.004, -0.006, 0.00005, 0.0, -0.003]
        }
    })
}

fn main() {
    let output_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "results/models".to_string());
    std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");

    for (name, model) in [
        ("OMC_Gradient Boosting_best.json", omc_model()),
        ("MDD_Gradient Boosting_best.json", mdd_model()),
    ] {
        let path = std::path::Path::new(&output_dir).join(name);
        let text = serde_json::to_string_pretty(&model).expect("Failed to serialize model");
        std::fs::write(&path, text).expect("Failed to write model");
        println!("Wrote {}", path.display());
    }
}
