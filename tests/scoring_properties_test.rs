use hackathon_scoreboard::domain::model::Team;
use hackathon_scoreboard::{
    infer_attribute, CategoryAttribute, CategoryScoring, HackathonConfig, ScoringStrategy,
    ScoringVariant,
};

fn teams_grid() -> Vec<Team> {
    let mut teams = Vec::new();
    let mut id = 1;
    for variant in [ScoringVariant::SecurityStandards, ScoringVariant::ModernTooling] {
        for attribute in [true, false] {
            for eligible in [true, false] {
                for scores in [[0, 0, 0, 0, 0], [1, 1, 1, 1, 1], [5, 5, 5, 5, 5], [10, 10, 10, 10, 10], [3, 0, 5, 2, 4]] {
                    let mut team = Team::new(
                        id,
                        format!("Team {}", id),
                        "Uni",
                        "Any",
                        scores,
                        CategoryScoring::new(variant, attribute),
                    );
                    team.eligible = eligible;
                    teams.push(team);
                    id += 1;
                }
            }
        }
    }
    teams
}

#[test]
fn test_overall_score_bounds() {
    for team in teams_grid() {
        let score = team.overall_score();
        if team.eligible {
            assert!((0.0..=5.0).contains(&score), "team {} scored {}", team.id, score);
        } else {
            assert_eq!(score, 0.0, "ineligible team {} must score 0", team.id);
        }
    }
}

#[test]
fn test_worked_examples() {
    let security = CategoryScoring::new(ScoringVariant::SecurityStandards, true);
    assert_eq!(security.overall_score(&[8, 8, 9, 7, 6], true), 5.0);

    let tooling = CategoryScoring::new(ScoringVariant::ModernTooling, false);
    assert_eq!(tooling.overall_score(&[1, 1, 1, 1, 1], true), 0.0);
}

#[test]
fn test_unknown_category_defaults_to_modern_tooling() {
    let registry = HackathonConfig::default().scoring_registry();

    assert_eq!(registry.resolve("Cybersecurity"), ScoringVariant::SecurityStandards);
    assert_eq!(registry.resolve("Data Science"), ScoringVariant::ModernTooling);
    assert_eq!(registry.resolve("Underwater Basket Weaving"), ScoringVariant::ModernTooling);
}

#[test]
fn test_attribute_heuristic_is_case_insensitive() {
    assert_eq!(
        infer_attribute("SECURE SOCKETS", "Data Science"),
        CategoryAttribute { security: true, tooling: false }
    );
    assert_eq!(
        infer_attribute("Frontend Folks", "Web Development"),
        CategoryAttribute { security: false, tooling: true }
    );
    assert_eq!(
        infer_attribute("SECURE DEVS", "web development"),
        CategoryAttribute { security: true, tooling: true }
    );
    assert_eq!(infer_attribute("Plain", "Plain"), CategoryAttribute::default());
}
