use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crates::domain::{
    entities::{
        active_user_records::InsertActiveUserRecordEntity, teams::InsertTeamEntity,
        users::InsertUserEntity,
    },
    repositories::sample_data::SampleDataRepository,
    value_objects::{
        identifiers::{random_email, random_id},
        team_profiles::TeamProfile,
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tracing::info;

/// Rows generated for one team profile, in insertion order.
#[derive(Debug, Clone)]
pub struct TeamRows {
    pub team: InsertTeamEntity,
    pub users: Vec<InsertUserEntity>,
    pub active_user_records: Vec<InsertActiveUserRecordEntity>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamReport {
    pub team_id: String,
    pub user_ids: Vec<String>,
    pub active_user_ids: Vec<String>,
}

/// Builds the rows for one team. Activity records go to the first
/// `active_last_30_days` users in generation order.
pub fn generate_team_rows<R: Rng + ?Sized>(
    profile: &TeamProfile,
    rng: &mut R,
    now: DateTime<Utc>,
) -> TeamRows {
    let team = InsertTeamEntity {
        id: random_id(rng),
        name: profile.name.clone(),
        timezone: None,
        created_at: now,
        organization_id: None,
    };

    let users: Vec<InsertUserEntity> = (0..profile.member_count)
        .map(|_| InsertUserEntity {
            id: random_id(rng),
            team_id: team.id.clone(),
            email: Some(random_email(rng)),
        })
        .collect();

    let active_user_records = users
        .iter()
        .take(profile.active_last_30_days)
        .map(|user| InsertActiveUserRecordEntity {
            id: random_id(rng),
            user_id: user.id.clone(),
            created_at: now,
        })
        .collect();

    TeamRows {
        team,
        users,
        active_user_records,
    }
}

/// Inserts synthetic teams, users and active user records. Every step commits
/// on its own, so a failure part-way leaves the rows written so far.
pub struct GenerateSampleDataUseCase {
    repository: Arc<dyn SampleDataRepository + Send + Sync>,
}

impl GenerateSampleDataUseCase {
    pub fn new(repository: Arc<dyn SampleDataRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn run(&self, profiles: &[TeamProfile]) -> Result<Vec<TeamReport>> {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(profiles, &mut rng).await
    }

    pub async fn run_with_rng<R: Rng + Send>(
        &self,
        profiles: &[TeamProfile],
        rng: &mut R,
    ) -> Result<Vec<TeamReport>> {
        let mut reports = Vec::with_capacity(profiles.len());

        for profile in profiles {
            let rows = generate_team_rows(profile, rng, Utc::now());
            let report = TeamReport {
                team_id: rows.team.id.clone(),
                user_ids: rows.users.iter().map(|user| user.id.clone()).collect(),
                active_user_ids: rows
                    .active_user_records
                    .iter()
                    .map(|record| record.user_id.clone())
                    .collect(),
            };

            self.repository
                .insert_team(rows.team)
                .await
                .with_context(|| format!("failed to insert team {}", profile.name))?;

            let users = self
                .repository
                .insert_users(rows.users)
                .await
                .with_context(|| format!("failed to insert users for team {}", profile.name))?;

            let active = self
                .repository
                .insert_active_user_records(rows.active_user_records)
                .await
                .with_context(|| {
                    format!("failed to insert active user records for team {}", profile.name)
                })?;

            info!(
                team = %profile.name,
                team_id = %report.team_id,
                users,
                active,
                "sample_data: team generated"
            );
            reports.push(report);
        }

        Ok(reports)
    }
}
