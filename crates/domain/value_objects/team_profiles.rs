/// Shape of one synthetic team: how many members it has and how many of them
/// were active in the last 30 days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamProfile {
    pub name: String,
    pub member_count: usize,
    pub active_last_30_days: usize,
}

impl TeamProfile {
    pub fn new(name: &str, member_count: usize, active_last_30_days: usize) -> Self {
        Self {
            name: name.to_string(),
            member_count,
            active_last_30_days,
        }
    }
}

pub fn sample_team_profiles() -> Vec<TeamProfile> {
    vec![
        TeamProfile::new("Acme Corporation", 120, 48),
        TeamProfile::new("Globex", 45, 45),
        TeamProfile::new("Initech", 30, 0),
        TeamProfile::new("Umbrella", 250, 180),
        TeamProfile::new("Small Shop", 3, 1),
    ]
}
