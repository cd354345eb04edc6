//! # Problem Bank
//!
//! The compiled-in set of worked problems, grouped by calculation kind. Built
//! once on first access and never mutated.
//!
//! Every numeric answer here must agree with the formula library within its
//! tolerance, and every prescription/prism answer must match the formatted
//! formula output. `evaluator::verify_bank` checks this, and the test suite
//! runs it over the whole bank.

use once_cell::sync::Lazy;

use crate::calculations::{CalculationKind, Given};
use crate::errors::{OpticsError, OpticsResult};
use crate::formulas::{
    base_curve::BaseCurveInput,
    compensated::{CompensatedInput, CompensationDirection},
    decentration::{DecentrationInput, FrameMeasurement},
    magnification::MagnificationInput,
    prism::{Direction, Eye, PrismInput},
    thickness::ThicknessInput,
    transposition::TranspositionInput,
    vertex::VertexInput,
};
use crate::problems::{CalculationCategory, CalculationProblem, Difficulty, ExpectedAnswer};
use crate::units::Unit;

use Difficulty::{Easy, Hard, Medium};

static CATEGORIES: Lazy<Vec<CalculationCategory>> = Lazy::new(|| {
    CalculationKind::ALL
        .into_iter()
        .map(|kind| {
            let meta = kind.metadata();
            CalculationCategory {
                kind,
                title: meta.name.to_string(),
                description: meta.description.to_string(),
                icon: kind.icon().to_string(),
                problems: problems_for(kind),
            }
        })
        .collect()
});

/// All categories, in [`CalculationKind::ALL`] order.
pub fn categories() -> &'static [CalculationCategory] {
    &CATEGORIES
}

/// The category for one kind.
pub fn category(kind: CalculationKind) -> &'static CalculationCategory {
    // CATEGORIES is built from CalculationKind::ALL in the same order
    &CATEGORIES[kind as usize]
}

/// Every problem in the bank, category by category.
pub fn all_problems() -> impl Iterator<Item = &'static CalculationProblem> {
    CATEGORIES.iter().flat_map(|c| c.problems.iter())
}

/// Look up a problem by id.
pub fn find_problem(id: &str) -> OpticsResult<&'static CalculationProblem> {
    all_problems()
        .find(|p| p.id == id)
        .ok_or_else(|| OpticsError::problem_not_found(id))
}

// =============================================================================
// Builders
// =============================================================================

fn numeric(value: f64, unit: Unit, tolerance: f64) -> ExpectedAnswer {
    ExpectedAnswer::Numeric { value, unit, tolerance }
}

fn text(value: &str) -> ExpectedAnswer {
    ExpectedAnswer::Text { value: value.to_string() }
}

fn problem(
    id: &str,
    difficulty: Difficulty,
    question: &str,
    given: Given,
    expected: ExpectedAnswer,
    explanation: &str,
    steps: &[&str],
) -> CalculationProblem {
    CalculationProblem {
        id: id.to_string(),
        difficulty,
        question: question.to_string(),
        given,
        expected,
        explanation: explanation.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
    }
}

fn problems_for(kind: CalculationKind) -> Vec<CalculationProblem> {
    match kind {
        CalculationKind::Transposition => transposition_problems(),
        CalculationKind::VertexDistance => vertex_problems(),
        CalculationKind::Prism => prism_problems(),
        CalculationKind::Decentration => decentration_problems(),
        CalculationKind::Thickness => thickness_problems(),
        CalculationKind::BaseCurve => base_curve_problems(),
        CalculationKind::Magnification => magnification_problems(),
        CalculationKind::CompensatedPower => compensated_problems(),
    }
}

// =============================================================================
// Transposition
// =============================================================================

fn transposition_problems() -> Vec<CalculationProblem> {
    let transpose = |sphere, cylinder, axis| Given::Transposition(TranspositionInput::Transpose { sphere, cylinder, axis });
    let se = |sphere, cylinder| Given::Transposition(TranspositionInput::SphericalEquivalent { sphere, cylinder });

    vec![
        problem(
            "transpose-001",
            Easy,
            "Transpose +2.00 +1.00 x 090 to minus-cylinder form.",
            transpose(2.0, 1.0, 90),
            text("+3.00 -1.00 x 180"),
            "Add the cylinder to the sphere, flip the cylinder sign, and rotate the axis by 90°.",
            &[
                "New sphere: +2.00 + (+1.00) = +3.00",
                "New cylinder: -(+1.00) = -1.00",
                "New axis: 090 + 90 = 180",
                "Result: +3.00 -1.00 x 180",
            ],
        ),
        problem(
            "transpose-002",
            Easy,
            "A lab ticket reads -3.50 +1.50 x 090. Write it in minus-cylinder form.",
            transpose(-3.5, 1.5, 90),
            text("-2.00 -1.50 x 180"),
            "Most labs surface in minus cylinder, so plus-cylinder prescriptions are transposed first.",
            &[
                "New sphere: -3.50 + 1.50 = -2.00",
                "New cylinder: -1.50",
                "New axis: 090 + 90 = 180",
            ],
        ),
        problem(
            "transpose-003",
            Medium,
            "Transpose +1.25 -0.75 x 045.",
            transpose(1.25, -0.75, 45),
            text("+0.50 +0.75 x 135"),
            "Transposition works the same way in both directions; minus cylinder becomes plus cylinder.",
            &[
                "New sphere: +1.25 + (-0.75) = +0.50",
                "New cylinder: +0.75",
                "New axis: 045 + 90 = 135",
            ],
        ),
        problem(
            "transpose-004",
            Medium,
            "Transpose -0.50 +2.00 x 170.",
            transpose(-0.5, 2.0, 170),
            text("+1.50 -2.00 x 080"),
            "When adding 90 takes the axis past 180, subtract 180.",
            &[
                "New sphere: -0.50 + 2.00 = +1.50",
                "New cylinder: -2.00",
                "New axis: 170 + 90 = 260; 260 - 180 = 080",
            ],
        ),
        problem(
            "transpose-005",
            Hard,
            "Transpose +0.75 -0.75 x 120.",
            transpose(0.75, -0.75, 120),
            text("pl +0.75 x 030"),
            "The sphere and cylinder cancel, so the transposed sphere is plano (0.00).",
            &[
                "New sphere: +0.75 + (-0.75) = 0.00 (plano)",
                "New cylinder: +0.75",
                "New axis: 120 + 90 = 210; 210 - 180 = 030",
            ],
        ),
        problem(
            "transpose-006",
            Easy,
            "What is the spherical equivalent of -2.00 -1.00 x 180?",
            se(-2.0, -1.0),
            numeric(-2.5, Unit::Diopters, 0.01),
            "Spherical equivalent is the sphere plus half the cylinder.",
            &["SE = -2.00 + (-1.00 / 2)", "SE = -2.50 D"],
        ),
        problem(
            "transpose-007",
            Medium,
            "What is the spherical equivalent of +1.50 -2.25 x 090?",
            se(1.5, -2.25),
            numeric(0.375, Unit::Diopters, 0.01),
            "Half of -2.25 is -1.125; the equivalent sphere lands between quarter steps.",
            &["SE = +1.50 + (-2.25 / 2)", "SE = +1.50 - 1.125 = +0.375 D"],
        ),
    ]
}

// =============================================================================
// Vertex Distance
// =============================================================================

fn vertex_problems() -> Vec<CalculationProblem> {
    let vertex = |original_power, original_vertex_mm, new_vertex_mm| {
        Given::VertexDistance(VertexInput {
            original_power,
            original_vertex_mm,
            new_vertex_mm,
        })
    };

    vec![
        problem(
            "vertex-001",
            Easy,
            "A -6.00 D lens is refracted at 12 mm. What power is needed at the cornea (0 mm)?",
            vertex(-6.0, 12.0, 0.0),
            numeric(-5.60, Unit::Diopters, 0.05),
            "Moving a minus lens closer to the eye makes it more effective, so less minus is needed.",
            &[
                "Displacement toward the eye: s = 0.012 m",
                "F' = F / (1 - s·F) = -6.00 / (1 - 0.012 × -6.00)",
                "F' = -6.00 / 1.072 = -5.60 D",
            ],
        ),
        problem(
            "vertex-002",
            Medium,
            "A +8.00 D lens is refracted at 12 mm. What power is needed at the cornea?",
            vertex(8.0, 12.0, 0.0),
            numeric(8.85, Unit::Diopters, 0.05),
            "Moving a plus lens closer makes it less effective, so more plus is needed.",
            &[
                "s = 0.012 m toward the eye",
                "F' = 8.00 / (1 - 0.012 × 8.00) = 8.00 / 0.904",
                "F' = +8.85 D",
            ],
        ),
        problem(
            "vertex-003",
            Medium,
            "A -10.00 D lens was refracted at 14 mm; the new frame sits at 10 mm. What power should be ordered?",
            vertex(-10.0, 14.0, 10.0),
            numeric(-9.62, Unit::Diopters, 0.05),
            "The lens moves 4 mm closer; high minus powers are sensitive even to small changes.",
            &[
                "s = (14 - 10) / 1000 = 0.004 m toward the eye",
                "F' = -10.00 / (1 - 0.004 × -10.00) = -10.00 / 1.04",
                "F' = -9.62 D",
            ],
        ),
        problem(
            "vertex-004",
            Hard,
            "A +12.00 D aphakic lens was refracted at 10 mm. The chosen frame holds it at 15 mm. What power is needed?",
            vertex(12.0, 10.0, 15.0),
            numeric(11.32, Unit::Diopters, 0.05),
            "Moving a plus lens away from the eye increases its effective power, so less plus is needed.",
            &[
                "The lens moves 5 mm away: s = -0.005 m",
                "F' = 12.00 / (1 - (-0.005) × 12.00) = 12.00 / 1.06",
                "F' = +11.32 D",
            ],
        ),
        problem(
            "vertex-005",
            Hard,
            "A -4.00 D spectacle lens is worn at 13 mm. What is its effective power at the corneal plane?",
            vertex(-4.0, 13.0, 0.0),
            numeric(-3.80, Unit::Diopters, 0.05),
            "At ±4.00 D the change reaches a quarter dioptre, which is why 4.00 D is the usual threshold for compensating.",
            &[
                "s = 0.013 m",
                "F' = -4.00 / (1 + 0.052) = -4.00 / 1.052",
                "F' = -3.80 D",
            ],
        ),
    ]
}

// =============================================================================
// Prism
// =============================================================================

fn prism_problems() -> Vec<CalculationProblem> {
    let prentice = |decentration_mm, power| Given::Prism(PrismInput::Prentice { decentration_mm, power });
    let with_base = |decentration_mm, power, oc_shift| {
        Given::Prism(PrismInput::PrenticeWithBase {
            decentration_mm,
            power,
            oc_shift,
        })
    };

    vec![
        problem(
            "prism-001",
            Easy,
            "How much prism is induced when a -4.00 D lens is decentred 5 mm?",
            prentice(5.0, -4.0),
            numeric(2.0, Unit::PrismDiopters, 0.1),
            "Prentice's Rule: prism equals decentration in centimetres times power.",
            &["c = 5 mm = 0.5 cm", "P = 0.5 × 4.00 = 2.0Δ"],
        ),
        problem(
            "prism-002",
            Easy,
            "A +3.00 D lens is decentred 4 mm. How much prism results?",
            prentice(4.0, 3.0),
            numeric(1.2, Unit::PrismDiopters, 0.1),
            "Convert millimetres to centimetres before multiplying.",
            &["c = 0.4 cm", "P = 0.4 × 3.00 = 1.2Δ"],
        ),
        problem(
            "prism-003",
            Medium,
            "How far must a +5.00 D lens be decentred to produce 2Δ?",
            Given::Prism(PrismInput::RequiredDecentration { prism: 2.0, power: 5.0 }),
            numeric(4.0, Unit::Millimeters, 0.1),
            "Rearrange Prentice's Rule: c = P / F, then convert to millimetres.",
            &["c = 2 / 5.00 = 0.4 cm", "c = 4 mm"],
        ),
        problem(
            "prism-004",
            Medium,
            "The optical centre of a -6.00 D lens sits 3 mm outward (temporal) of the pupil. Give the induced prism and base.",
            with_base(3.0, -6.0, Direction::Out),
            text("1.80 BI"),
            "A minus lens is thickest at the edge; with the OC out, the pupil looks through the nasal side, so the base is in.",
            &[
                "P = 0.3 × 6.00 = 1.80Δ",
                "Minus lens, OC out: base in",
                "Result: 1.80 BI",
            ],
        ),
        problem(
            "prism-005",
            Medium,
            "A reader looks through a +2.50 D lens 8 mm below its optical centre. Give the prism and base.",
            with_base(8.0, 2.5, Direction::Up),
            text("2.00 BU"),
            "A plus lens's base points toward its optical centre, which is above the reading point.",
            &[
                "P = 0.8 × 2.50 = 2.00Δ",
                "Plus lens, OC above the pupil: base up",
            ],
        ),
        problem(
            "prism-006",
            Hard,
            "Resolve 3.00Δ at base 30° (360° notation) for the right eye into horizontal and vertical components.",
            Given::Prism(PrismInput::Oblique {
                magnitude: 3.0,
                base_angle_deg: 30.0,
                eye: Eye::Right,
            }),
            text("2.60 BI 1.50 BU"),
            "For the right eye, 0° points nasally, so a positive horizontal component is base in.",
            &[
                "Horizontal: 3.00 × cos 30° = 2.60Δ, base in (OD)",
                "Vertical: 3.00 × sin 30° = 1.50Δ, base up",
            ],
        ),
        problem(
            "prism-007",
            Hard,
            "A patient with a 62 mm PD receives -5.00 D lenses with optical centres set at 70 mm. How much prism does each eye get?",
            prentice(4.0, -5.0),
            numeric(2.0, Unit::PrismDiopters, 0.1),
            "Each OC is 4 mm outward of its pupil; with minus lenses that is base-in prism in both eyes, 4Δ total.",
            &[
                "Per-eye error: (70 - 62) / 2 = 4 mm",
                "P = 0.4 × 5.00 = 2.0Δ per eye",
                "Minus lens, OC out: base in (4Δ BI total)",
            ],
        ),
    ]
}

// =============================================================================
// Decentration
// =============================================================================

fn decentration_problems() -> Vec<CalculationProblem> {
    let boxing = |a_mm, dbl_mm| FrameMeasurement::Boxing { a_mm, dbl_mm };

    vec![
        problem(
            "decentration-001",
            Easy,
            "Frame PD is 70 mm and the patient's PD is 64 mm. How much should each lens be decentred?",
            Given::Decentration(DecentrationInput::PerLens {
                frame: FrameMeasurement::Pd { frame_pd_mm: 70.0 },
                patient_pd_mm: 64.0,
            }),
            numeric(3.0, Unit::Millimeters, 0.1),
            "The frame centres are wider than the eyes, so each OC moves inward by half the difference.",
            &["(70 - 64) / 2 = 3 mm", "3 mm inward per lens"],
        ),
        problem(
            "decentration-002",
            Easy,
            "A frame measures A = 52 mm, DBL = 18 mm. The patient's PD is 62 mm. What is the per-lens decentration?",
            Given::Decentration(DecentrationInput::PerLens {
                frame: boxing(52.0, 18.0),
                patient_pd_mm: 62.0,
            }),
            numeric(4.0, Unit::Millimeters, 0.1),
            "Frame PD is the eye size plus the bridge.",
            &["Frame PD = 52 + 18 = 70 mm", "(70 - 62) / 2 = 4 mm inward"],
        ),
        problem(
            "decentration-003",
            Medium,
            "A = 54 mm, DBL = 16 mm, PD = 64 mm, ED = 58 mm. What is the minimum blank size?",
            Given::Decentration(DecentrationInput::MinimumBlankSize {
                frame: boxing(54.0, 16.0),
                patient_pd_mm: 64.0,
                effective_diameter_mm: 58.0,
            }),
            numeric(66.0, Unit::Millimeters, 0.1),
            "MBS is the effective diameter plus twice the decentration plus 2 mm for edging.",
            &[
                "Frame PD = 70 mm; decentration = 3 mm",
                "MBS = 58 + 2 × 3 + 2 = 66 mm",
                "Order the next stocked size up (70 mm)",
            ],
        ),
        problem(
            "decentration-004",
            Medium,
            "A = 50 mm, DBL = 20 mm, PD = 66 mm, ED = 55 mm. Find the minimum blank size.",
            Given::Decentration(DecentrationInput::MinimumBlankSize {
                frame: boxing(50.0, 20.0),
                patient_pd_mm: 66.0,
                effective_diameter_mm: 55.0,
            }),
            numeric(61.0, Unit::Millimeters, 0.1),
            "Small decentrations keep the blank small.",
            &[
                "Frame PD = 70 mm; decentration = (70 - 66) / 2 = 2 mm",
                "MBS = 55 + 4 + 2 = 61 mm",
            ],
        ),
        problem(
            "decentration-005",
            Medium,
            "A = 50 mm, DBL = 18 mm. The right monocular PD is 31.5 mm. How far should the right lens be decentred?",
            Given::Decentration(DecentrationInput::Monocular {
                frame: boxing(50.0, 18.0),
                monocular_pd_mm: 31.5,
            }),
            numeric(2.5, Unit::Millimeters, 0.1),
            "With monocular PDs each eye is decentred from half the frame PD.",
            &["Frame PD / 2 = 68 / 2 = 34 mm", "34 - 31.5 = 2.5 mm inward"],
        ),
        problem(
            "decentration-006",
            Hard,
            "Frame PD is 64 mm and the patient's PD is 68 mm. What is the per-lens decentration? (Use a negative value for outward.)",
            Given::Decentration(DecentrationInput::PerLens {
                frame: FrameMeasurement::Pd { frame_pd_mm: 64.0 },
                patient_pd_mm: 68.0,
            }),
            numeric(-2.0, Unit::Millimeters, 0.1),
            "The frame is narrower than the eyes, so each OC moves outward.",
            &["(64 - 68) / 2 = -2 mm", "2 mm outward per lens"],
        ),
        problem(
            "decentration-007",
            Hard,
            "A = 48 mm, DBL = 18 mm, PD = 70 mm, ED = 52 mm. What is the minimum blank size?",
            Given::Decentration(DecentrationInput::MinimumBlankSize {
                frame: boxing(48.0, 18.0),
                patient_pd_mm: 70.0,
                effective_diameter_mm: 52.0,
            }),
            numeric(58.0, Unit::Millimeters, 0.1),
            "Outward decentration enlarges the blank exactly as inward decentration does; use its magnitude.",
            &[
                "Frame PD = 66 mm; decentration = -2 mm (outward)",
                "MBS = 52 + 2 × 2 + 2 = 58 mm",
            ],
        ),
    ]
}

// =============================================================================
// Thickness
// =============================================================================

fn thickness_problems() -> Vec<CalculationProblem> {
    let lens = |power, index, diameter_mm, min_thickness_mm| {
        Given::Thickness(ThicknessInput {
            power,
            index,
            diameter_mm,
            min_thickness_mm,
            decentration_mm: 0.0,
        })
    };

    vec![
        problem(
            "thickness-001",
            Easy,
            "Estimate the centre thickness of a +2.00 D, 1.50 index, 50 mm lens with a 1.0 mm edge.",
            lens(2.0, 1.5, 50.0, 1.0),
            numeric(2.25, Unit::Millimeters, 0.1),
            "A plus lens is thickest at the centre: centre = edge + sag.",
            &[
                "r = 25 mm",
                "sag = 25² × 2.00 / (1000 × 0.50 × 2) = 1.25 mm",
                "Centre = 1.0 + 1.25 = 2.25 mm",
            ],
        ),
        problem(
            "thickness-002",
            Medium,
            "Estimate the edge thickness of a -4.00 D, 1.50 index, 60 mm lens with a 2.0 mm centre.",
            lens(-4.0, 1.5, 60.0, 2.0),
            numeric(5.6, Unit::Millimeters, 0.1),
            "A minus lens is thickest at the edge: edge = centre + sag.",
            &[
                "r = 30 mm",
                "sag = 900 × 4.00 / (1000 × 0.50 × 2) = 3.6 mm",
                "Edge = 2.0 + 3.6 = 5.6 mm",
            ],
        ),
        problem(
            "thickness-003",
            Medium,
            "Estimate the centre thickness of a +4.00 D, 1.50 index, 60 mm lens with a 1.0 mm edge.",
            lens(4.0, 1.5, 60.0, 1.0),
            numeric(4.6, Unit::Millimeters, 0.1),
            "Same sag as the -4.00 D lens of the same size, but it is added at the centre.",
            &["sag = 3.6 mm", "Centre = 1.0 + 3.6 = 4.6 mm"],
        ),
        problem(
            "thickness-004",
            Hard,
            "Estimate the edge thickness of a -6.00 D polycarbonate (n = 1.586) lens, 56 mm diameter, 1.0 mm centre.",
            lens(-6.0, 1.586, 56.0, 1.0),
            numeric(5.01, Unit::Millimeters, 0.1),
            "Polycarbonate's higher index and thin centre keep a moderately high minus lens under 5.5 mm at the edge.",
            &[
                "r = 28 mm",
                "sag = 784 × 6.00 / (1000 × 0.586 × 2) = 4.01 mm",
                "Edge = 1.0 + 4.01 = 5.01 mm",
            ],
        ),
        problem(
            "thickness-005",
            Hard,
            "A -3.00 D, 1.60 index lens has a 52 mm ED and is decentred 3 mm. With a 1.5 mm centre, estimate the thickest edge.",
            Given::Thickness(ThicknessInput {
                power: -3.0,
                index: 1.6,
                diameter_mm: 52.0,
                min_thickness_mm: 1.5,
                decentration_mm: 3.0,
            }),
            numeric(3.60, Unit::Millimeters, 0.1),
            "Decentration moves the OC, so the far edge sits farther from it than half the ED.",
            &[
                "r = 26 + 3 = 29 mm",
                "sag = 841 × 3.00 / (1000 × 0.60 × 2) = 2.10 mm",
                "Edge = 1.5 + 2.10 = 3.60 mm",
            ],
        ),
        problem(
            "thickness-006",
            Hard,
            "Compare the sag of a -6.00 D, 60 mm lens in CR-39 (n = 1.498) and polycarbonate (n = 1.586). How do they differ?",
            lens(-6.0, 1.586, 60.0, 1.0),
            text("Poly is about 15% thinner"),
            "Sag scales with 1 / (n - 1), so the ratio of the two sags is 0.498 / 0.586.",
            &[
                "CR-39 sag = 900 × 6.00 / (1000 × 0.498 × 2) = 5.42 mm",
                "Poly sag = 900 × 6.00 / (1000 × 0.586 × 2) = 4.61 mm",
                "4.61 / 5.42 = 0.85, so poly is about 15% thinner",
            ],
        ),
    ]
}

// =============================================================================
// Base Curve
// =============================================================================

fn base_curve_problems() -> Vec<CalculationProblem> {
    let vogel = |sphere_power| {
        Given::BaseCurve(BaseCurveInput {
            sphere_power,
            round_to_series: false,
        })
    };

    vec![
        problem(
            "base-curve-001",
            Easy,
            "Using Vogel's Rule, what base curve suits a -3.00 D lens?",
            vogel(-3.0),
            numeric(4.5, Unit::Diopters, 0.5),
            "For minus lenses, half the sphere plus 6.",
            &["BC = -3.00 / 2 + 6", "BC = 4.50 D"],
        ),
        problem(
            "base-curve-002",
            Easy,
            "Using Vogel's Rule, what base curve suits a +2.00 D lens?",
            vogel(2.0),
            numeric(7.0, Unit::Diopters, 0.5),
            "Plus prescriptions need steeper base curves.",
            &["BC = +2.00 / 2 + 6", "BC = 7.00 D"],
        ),
        problem(
            "base-curve-003",
            Medium,
            "What base curve does Vogel's Rule give for -6.00 D?",
            vogel(-6.0),
            numeric(3.0, Unit::Diopters, 0.5),
            "Higher minus powers take flatter base curves.",
            &["BC = -6.00 / 2 + 6 = 3.00 D"],
        ),
        problem(
            "base-curve-004",
            Medium,
            "For -4.75 D, apply Vogel's Rule and round to the nearest manufactured base curve (0.50 D steps).",
            Given::BaseCurve(BaseCurveInput {
                sphere_power: -4.75,
                round_to_series: true,
            }),
            numeric(3.5, Unit::Diopters, 0.01),
            "The raw rule lands between stock curves; pick the closest one the lab makes.",
            &["BC = -4.75 / 2 + 6 = 3.625 D", "Nearest 0.50 D step: 3.50 D"],
        ),
        problem(
            "base-curve-005",
            Hard,
            "A -2.00 D patient chose a high-wrap sport frame. Vogel's Rule gives 5.00 D. What should the dispenser do?",
            vogel(-2.0),
            text("Use a steeper base curve of about 8.00 D to follow the frame wrap"),
            "A flat 5.00 D lens will not seat in a wrapped frame; the curve is chosen for the frame, and the prescription is compensated for the tilt.",
            &[
                "Vogel: -2.00 / 2 + 6 = 5.00 D",
                "Wrap frames are designed around 8-base lenses",
                "Order 8.00 D base and compensate for wrap",
            ],
        ),
        problem(
            "base-curve-006",
            Hard,
            "A patient has worn a 6.00 D base for years. The new -1.00 D prescription gives 5.50 D by Vogel's Rule. What base curve should be ordered?",
            vogel(-1.0),
            text("Keep the 6.00 D base curve the patient is adapted to"),
            "Changing base curve by a small amount can cause adaptation complaints; matching the old curve outweighs the rule.",
            &[
                "Vogel: -1.00 / 2 + 6 = 5.50 D",
                "Difference from current lenses is only 0.50 D",
                "Match the previous 6.00 D base",
            ],
        ),
    ]
}

// =============================================================================
// Magnification
// =============================================================================

fn magnification_problems() -> Vec<CalculationProblem> {
    vec![
        problem(
            "magnification-001",
            Easy,
            "What is the power-factor magnification of a +10.00 D lens worn 12 mm from the eye?",
            Given::Magnification(MagnificationInput::PowerFactor {
                power: 10.0,
                distance_mm: 12.0,
            }),
            numeric(1.136, Unit::Magnification, 0.01),
            "Plus lenses in front of the eye magnify; the effect grows with distance.",
            &["SM = 1 / (1 - 0.012 × 10.00)", "SM = 1 / 0.88 = 1.136"],
        ),
        problem(
            "magnification-002",
            Medium,
            "What is the power-factor magnification of a -8.00 D lens at 13 mm?",
            Given::Magnification(MagnificationInput::PowerFactor {
                power: -8.0,
                distance_mm: 13.0,
            }),
            numeric(0.906, Unit::Magnification, 0.01),
            "Minus lenses minify: the factor is below 1.",
            &["SM = 1 / (1 + 0.013 × 8.00)", "SM = 1 / 1.104 = 0.906"],
        ),
        problem(
            "magnification-003",
            Medium,
            "A lens has a +8.00 D front curve, 5 mm centre thickness and index 1.50. What is its shape factor?",
            Given::Magnification(MagnificationInput::ShapeFactor {
                front_power: 8.0,
                center_thickness_mm: 5.0,
                index: 1.5,
            }),
            numeric(1.027, Unit::Magnification, 0.005),
            "Steeper front curves and thicker lenses magnify more.",
            &[
                "t/n = 0.005 / 1.50 = 0.00333 m",
                "SM = 1 / (1 - 0.00333 × 8.00) = 1 / 0.9733",
                "SM = 1.027",
            ],
        ),
        problem(
            "magnification-004",
            Hard,
            "A +6.00 D lens at 15 mm has a +9.00 D front curve, 6 mm centre thickness and index 1.50. Find the total spectacle magnification.",
            Given::Magnification(MagnificationInput::Total {
                power: 6.0,
                distance_mm: 15.0,
                front_power: 9.0,
                center_thickness_mm: 6.0,
                index: 1.5,
            }),
            numeric(1.140, Unit::Magnification, 0.01),
            "Total magnification is the product of the shape and power factors.",
            &[
                "Power factor = 1 / (1 - 0.015 × 6.00) = 1.0989",
                "Shape factor = 1 / (1 - 0.004 × 9.00) = 1.0373",
                "SM = 1.0989 × 1.0373 = 1.140",
            ],
        ),
    ]
}

// =============================================================================
// Compensated Power
// =============================================================================

fn compensated_problems() -> Vec<CalculationProblem> {
    let compensated = |power, vertex_mm, direction, round_to_step| {
        Given::CompensatedPower(CompensatedInput {
            power,
            vertex_mm,
            direction,
            round_to_step,
        })
    };
    use CompensationDirection::{ContactToSpectacle, SpectacleToContact};

    vec![
        problem(
            "compensated-001",
            Easy,
            "Convert a -5.00 D spectacle prescription (12 mm vertex) to contact-lens power.",
            compensated(-5.0, 12.0, SpectacleToContact, false),
            numeric(-4.72, Unit::Diopters, 0.05),
            "On the cornea a minus lens needs less power than at the spectacle plane.",
            &["F_cl = -5.00 / (1 - 0.012 × -5.00)", "F_cl = -5.00 / 1.06 = -4.72 D"],
        ),
        problem(
            "compensated-002",
            Medium,
            "Convert a +6.00 D spectacle prescription (12 mm vertex) to contact-lens power.",
            compensated(6.0, 12.0, SpectacleToContact, false),
            numeric(6.47, Unit::Diopters, 0.05),
            "Plus contact lenses need more power than the spectacles they replace.",
            &["F_cl = 6.00 / (1 - 0.012 × 6.00)", "F_cl = 6.00 / 0.928 = +6.47 D"],
        ),
        problem(
            "compensated-003",
            Medium,
            "A patient wears +10.00 D contact lenses. What spectacle power is needed at 12 mm?",
            compensated(10.0, 12.0, ContactToSpectacle, false),
            numeric(8.93, Unit::Diopters, 0.05),
            "Going from the cornea out to the spectacle plane reverses the correction: a plus lens moved away needs less plus.",
            &[
                "The lens moves 12 mm away from the eye",
                "F_spec = 10.00 / (1 + 0.012 × 10.00) = 10.00 / 1.12",
                "F_spec = +8.93 D",
            ],
        ),
        problem(
            "compensated-004",
            Hard,
            "A -8.00 D spectacle lens is worn at 14 mm. What contact-lens power should be ordered (0.25 D steps)?",
            compensated(-8.0, 14.0, SpectacleToContact, true),
            numeric(-7.25, Unit::Diopters, 0.01),
            "Compensate, then round to the nearest stocked power.",
            &[
                "F_cl = -8.00 / (1 + 0.014 × 8.00) = -8.00 / 1.112 = -7.19 D",
                "Nearest 0.25 D step: -7.25 D",
            ],
        ),
        problem(
            "compensated-005",
            Easy,
            "Convert -3.00 D at 12 mm to contact-lens power. Is the change clinically significant?",
            compensated(-3.0, 12.0, SpectacleToContact, false),
            numeric(-2.90, Unit::Diopters, 0.05),
            "Below about 4.00 D the compensation is less than a quarter dioptre and is usually ignored.",
            &["F_cl = -3.00 / 1.036 = -2.90 D", "Change of 0.10 D: order -3.00 D"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_problems() {
        for kind in CalculationKind::ALL {
            let cat = category(kind);
            assert_eq!(cat.kind, kind);
            assert!(!cat.problems.is_empty(), "{} has no problems", kind);
        }
    }

    #[test]
    fn test_problems_are_filed_under_their_kind() {
        for cat in categories() {
            for p in &cat.problems {
                assert_eq!(p.kind(), cat.kind, "{} is in the wrong category", p.id);
            }
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for p in all_problems() {
            assert!(seen.insert(p.id.as_str()), "duplicate id {}", p.id);
        }
        assert_eq!(seen.len(), 47);
    }

    #[test]
    fn test_every_problem_has_steps() {
        for p in all_problems() {
            assert!(!p.steps.is_empty(), "{} has no steps", p.id);
            assert!(!p.question.is_empty());
            assert!(!p.explanation.is_empty());
        }
    }

    #[test]
    fn test_numeric_tolerances_are_positive() {
        for p in all_problems() {
            if let ExpectedAnswer::Numeric { tolerance, value, .. } = p.expected {
                assert!(tolerance > 0.0, "{}", p.id);
                assert!(value.is_finite(), "{}", p.id);
            }
        }
    }

    #[test]
    fn test_find_problem() {
        assert_eq!(find_problem("prism-001").unwrap().kind(), CalculationKind::Prism);
        assert_eq!(find_problem("nope").unwrap_err().error_code(), "PROBLEM_NOT_FOUND");
    }

    #[test]
    fn test_order_is_stable() {
        let first: Vec<&str> = all_problems().map(|p| p.id.as_str()).collect();
        let second: Vec<&str> = all_problems().map(|p| p.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "transpose-001");
    }
}
