//! Built-in curriculum templates for JEE/NEET subjects.
//!
//! Small, hand-authored prerequisite graphs. Unknown subjects get no
//! template; callers surface that as a not-found error.

use super::graph::NodeTemplate;
use super::types::Tier;

fn node(
    id: &str,
    title: &str,
    subject: &str,
    topic: &str,
    tier: Tier,
    prerequisites: &[&str],
    next_up: &[&str],
) -> NodeTemplate {
    NodeTemplate {
        id: id.to_string(),
        title: title.to_string(),
        subject: subject.to_string(),
        topic: topic.to_string(),
        subtopic: title.to_string(),
        tier,
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        next_up: next_up.iter().map(|n| n.to_string()).collect(),
    }
}

/// Returns the curriculum for a subject, or `None` for subjects we do not
/// ship a graph for.
pub fn template_for(subject: &str) -> Option<Vec<NodeTemplate>> {
    match subject.to_lowercase().as_str() {
        "physics" => Some(physics()),
        "chemistry" => Some(chemistry()),
        "mathematics" | "maths" => Some(mathematics()),
        "biology" => Some(biology()),
        _ => None,
    }
}

fn physics() -> Vec<NodeTemplate> {
    let s = "Physics";
    vec![
        node("phy-units", "Units & Measurement", s, "General", Tier::Foundation, &[], &["phy-kinematics"]),
        node("phy-kinematics", "Kinematics", s, "Mechanics", Tier::Foundation, &["phy-units"], &["phy-laws"]),
        node("phy-laws", "Laws of Motion", s, "Mechanics", Tier::Intermediate, &["phy-kinematics"], &["phy-work-energy"]),
        node("phy-work-energy", "Work, Energy & Power", s, "Mechanics", Tier::Intermediate, &["phy-laws"], &["phy-rotation"]),
        node("phy-rotation", "Rotational Motion", s, "Mechanics", Tier::Advanced, &["phy-work-energy"], &["phy-gravitation"]),
        node("phy-gravitation", "Gravitation", s, "Mechanics", Tier::Advanced, &["phy-work-energy"], &[]),
        node("phy-electrostatics", "Electrostatics", s, "Electromagnetism", Tier::Intermediate, &["phy-units"], &["phy-current"]),
        node("phy-current", "Current Electricity", s, "Electromagnetism", Tier::Advanced, &["phy-electrostatics"], &["phy-magnetism"]),
        node("phy-magnetism", "Magnetic Effects of Current", s, "Electromagnetism", Tier::Expert, &["phy-current"], &[]),
    ]
}

fn chemistry() -> Vec<NodeTemplate> {
    let s = "Chemistry";
    vec![
        node("chem-mole", "Mole Concept", s, "Physical", Tier::Foundation, &[], &["chem-atomic"]),
        node("chem-atomic", "Atomic Structure", s, "Physical", Tier::Foundation, &["chem-mole"], &["chem-bonding"]),
        node("chem-bonding", "Chemical Bonding", s, "Physical", Tier::Intermediate, &["chem-atomic"], &["chem-thermo"]),
        node("chem-thermo", "Thermodynamics", s, "Physical", Tier::Advanced, &["chem-bonding"], &["chem-equilibrium"]),
        node("chem-equilibrium", "Chemical Equilibrium", s, "Physical", Tier::Advanced, &["chem-thermo"], &[]),
        node("chem-periodic", "Periodic Table", s, "Inorganic", Tier::Foundation, &["chem-atomic"], &[]),
        node("chem-goc", "General Organic Chemistry", s, "Organic", Tier::Intermediate, &["chem-bonding"], &["chem-hydrocarbons"]),
        node("chem-hydrocarbons", "Hydrocarbons", s, "Organic", Tier::Expert, &["chem-goc"], &[]),
    ]
}

fn mathematics() -> Vec<NodeTemplate> {
    let s = "Mathematics";
    vec![
        node("math-sets", "Sets & Relations", s, "Algebra", Tier::Foundation, &[], &["math-functions"]),
        node("math-functions", "Functions", s, "Algebra", Tier::Foundation, &["math-sets"], &["math-limits"]),
        node("math-quadratics", "Quadratic Equations", s, "Algebra", Tier::Intermediate, &["math-sets"], &[]),
        node("math-limits", "Limits & Continuity", s, "Calculus", Tier::Intermediate, &["math-functions"], &["math-derivatives"]),
        node("math-derivatives", "Differentiation", s, "Calculus", Tier::Advanced, &["math-limits"], &["math-integrals"]),
        node("math-integrals", "Integration", s, "Calculus", Tier::Expert, &["math-derivatives"], &[]),
        node("math-trig", "Trigonometry", s, "Geometry", Tier::Foundation, &[], &["math-vectors"]),
        node("math-vectors", "Vectors", s, "Geometry", Tier::Intermediate, &["math-trig"], &[]),
    ]
}

fn biology() -> Vec<NodeTemplate> {
    let s = "Biology";
    vec![
        node("bio-cell", "Cell Structure", s, "Cell Biology", Tier::Foundation, &[], &["bio-biomolecules"]),
        node("bio-biomolecules", "Biomolecules", s, "Cell Biology", Tier::Foundation, &["bio-cell"], &["bio-division"]),
        node("bio-division", "Cell Division", s, "Cell Biology", Tier::Intermediate, &["bio-cell"], &["bio-genetics"]),
        node("bio-genetics", "Genetics", s, "Genetics", Tier::Advanced, &["bio-division"], &["bio-evolution"]),
        node("bio-evolution", "Evolution", s, "Genetics", Tier::Advanced, &["bio-genetics"], &[]),
        node("bio-physiology", "Human Physiology", s, "Physiology", Tier::Intermediate, &["bio-biomolecules"], &["bio-reproduction"]),
        node("bio-reproduction", "Reproduction", s, "Physiology", Tier::Expert, &["bio-physiology"], &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::LearningGraph;
    use crate::core::types::Level;

    #[test]
    fn test_all_builtin_templates_are_valid_dags() {
        for subject in ["Physics", "Chemistry", "Mathematics", "Biology"] {
            let templates = template_for(subject).unwrap();
            LearningGraph::from_template(&templates, Level::Beginner)
                .unwrap_or_else(|e| panic!("{subject} template invalid: {e}"));
        }
    }

    #[test]
    fn test_unknown_subject_has_no_template() {
        assert!(template_for("Geography").is_none());
    }

    #[test]
    fn test_next_up_hints_reference_real_nodes() {
        for subject in ["Physics", "Chemistry", "Mathematics", "Biology"] {
            let templates = template_for(subject).unwrap();
            let ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
            for template in &templates {
                for hint in &template.next_up {
                    assert!(ids.contains(&hint.as_str()), "{} -> {}", template.id, hint);
                }
            }
        }
    }
}
