//! # Formula Registry
//!
//! Metadata for every calculation family: display name, plain-text formula,
//! variables and the assumptions behind it. Category titles in the problem
//! bank and the generated `FORMULAS.md` both read from here, so a formula is
//! described in exactly one place.
//!
//! ## Usage
//!
//! ```rust
//! use optics_core::calculations::CalculationKind;
//!
//! let meta = CalculationKind::Prism.metadata();
//! assert!(meta.formula_plain.contains("P = c"));
//! ```

use crate::calculations::CalculationKind;

/// Definition of a variable used in a formula.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "F", "d", "n")
    pub symbol: &'static str,
    pub description: &'static str,
    /// Units (e.g., "D", "mm", "Δ")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

/// Everything needed to document one calculation family.
#[derive(Debug, Clone)]
pub struct FormulaMetadata {
    pub name: &'static str,
    pub description: &'static str,
    /// Formula(s) in plain text, one per line
    pub formula_plain: &'static str,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<&'static str>,
    /// Module implementing the formula
    pub source_module: &'static str,
}

impl CalculationKind {
    /// Registry entry for this kind.
    pub fn metadata(&self) -> FormulaMetadata {
        match self {
            CalculationKind::Transposition => FormulaMetadata {
                name: "Prescription Transposition",
                description: "Convert between plus- and minus-cylinder form",
                formula_plain: "S' = S + C\nC' = -C\nA' = (A + 90) mod 180\nSE = S + C/2",
                variables: vec![
                    Variable::new("S", "Sphere power", "D"),
                    Variable::new("C", "Cylinder power", "D"),
                    Variable::new("A", "Cylinder axis", "°"),
                ],
                assumptions: vec!["A sphere (C = 0) keeps its axis unchanged"],
                source_module: "formulas::transposition",
            },
            CalculationKind::VertexDistance => FormulaMetadata {
                name: "Vertex-Distance Compensation",
                description: "Power needed when a lens moves toward or away from the eye",
                formula_plain: "s = -(d_new - d_old) / 1000\nF' = F / (1 - s·F)",
                variables: vec![
                    Variable::new("F", "Original power", "D"),
                    Variable::new("d", "Back vertex distance", "mm"),
                    Variable::new("s", "Displacement toward the eye", "m"),
                ],
                assumptions: vec![
                    "Thin-lens effectivity",
                    "Undefined when s·F = 1",
                ],
                source_module: "formulas::vertex",
            },
            CalculationKind::Prism => FormulaMetadata {
                name: "Prentice's Rule",
                description: "Prism induced by decentration, and its base direction",
                formula_plain: "P = c · F   (c in cm)\nc = P / F\nH = P·cos θ, V = P·sin θ",
                variables: vec![
                    Variable::new("P", "Prism", "Δ"),
                    Variable::new("c", "Decentration", "cm"),
                    Variable::new("F", "Lens power", "D"),
                    Variable::new("θ", "Base angle (360° notation)", "°"),
                ],
                assumptions: vec![
                    "Plus lens: base toward the optical centre",
                    "Minus lens: base away from the optical centre",
                ],
                source_module: "formulas::prism",
            },
            CalculationKind::Decentration => FormulaMetadata {
                name: "Decentration and Minimum Blank Size",
                description: "Optical-centre placement and the smallest usable blank",
                formula_plain: "frame PD = A + DBL\ndec = (frame PD - PD) / 2\nMBS = ED + 2·|dec| + margin",
                variables: vec![
                    Variable::new("A", "Eye size", "mm"),
                    Variable::new("DBL", "Distance between lenses", "mm"),
                    Variable::new("PD", "Patient pupillary distance", "mm"),
                    Variable::new("ED", "Effective diameter", "mm"),
                ],
                assumptions: vec![
                    "Positive decentration is inward",
                    "Safety margin defaults to 2 mm",
                    "Rounding up to a stocked blank is a separate lookup",
                ],
                source_module: "formulas::decentration",
            },
            CalculationKind::Thickness => FormulaMetadata {
                name: "Lens Thickness Estimate",
                description: "Approximate edge or centre thickness from surface sag",
                formula_plain: "sag = r²·|F| / (1000·(n - 1)·2)\nminus: edge = centre + sag\nplus: centre = edge + sag",
                variables: vec![
                    Variable::new("r", "Semi-diameter (plus decentration)", "mm"),
                    Variable::new("F", "Lens power", "D"),
                    Variable::new("n", "Refractive index", ""),
                ],
                assumptions: vec!["Paraxial sag approximation, not exact spherical sag"],
                source_module: "formulas::thickness",
            },
            CalculationKind::BaseCurve => FormulaMetadata {
                name: "Vogel's Rule",
                description: "Starting base curve for a single-vision lens",
                formula_plain: "BC = S/2 + 6",
                variables: vec![Variable::new("S", "Sphere power", "D")],
                assumptions: vec![
                    "Snapped to the manufactured series as a separate step",
                    "Frame wrap and patient adaptation may override the rule",
                ],
                source_module: "formulas::base_curve",
            },
            CalculationKind::Magnification => FormulaMetadata {
                name: "Spectacle Magnification",
                description: "Retinal image size change from power and lens form",
                formula_plain: "SM_power = 1 / (1 - h·F)\nSM_shape = 1 / (1 - (t/n)·F1)\nSM = SM_shape · SM_power",
                variables: vec![
                    Variable::new("h", "Lens-to-eye distance", "m"),
                    Variable::new("F", "Back vertex power", "D"),
                    Variable::new("t", "Centre thickness", "m"),
                    Variable::new("n", "Refractive index", ""),
                    Variable::new("F1", "Front surface power", "D"),
                ],
                assumptions: vec!["Power factor shares the vertex effectivity factor"],
                source_module: "formulas::magnification",
            },
            CalculationKind::CompensatedPower => FormulaMetadata {
                name: "Compensated Contact-Lens Power",
                description: "Carry a power between the spectacle plane and the cornea",
                formula_plain: "F_cl = F_spec / (1 - d·F_spec)\nF_spec = F_cl / (1 + d·F_cl)",
                variables: vec![
                    Variable::new("F", "Power", "D"),
                    Variable::new("d", "Spectacle vertex distance", "m"),
                ],
                assumptions: vec![
                    "Vertex compensation with the contact lens at 0 mm",
                    "Optionally rounded to 0.25 D stock steps",
                ],
                source_module: "formulas::compensated",
            },
        }
    }
}

/// Render every registry entry as a markdown reference.
pub fn generate_formulas_markdown() -> String {
    let mut md = String::new();
    md.push_str("# Formula Reference\n\n");
    md.push_str("Generated from `optics_core::formulas::registry`. Do not edit by hand.\n\n");

    for kind in CalculationKind::ALL {
        let meta = kind.metadata();
        md.push_str(&format!("## {}\n\n", meta.name));
        md.push_str(&format!("{}\n\n", meta.description));
        md.push_str("```text\n");
        md.push_str(meta.formula_plain);
        md.push_str("\n```\n\n");

        md.push_str("| Symbol | Description | Units |\n|---|---|---|\n");
        for var in &meta.variables {
            md.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
        }
        md.push('\n');

        if !meta.assumptions.is_empty() {
            md.push_str("**Assumptions:**\n\n");
            for assumption in &meta.assumptions {
                md.push_str(&format!("- {}\n", assumption));
            }
            md.push('\n');
        }
        md.push_str(&format!("*Source:* `{}`\n\n", meta.source_module));
    }
    md
}
