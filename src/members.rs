//! Band-member store instance.
//!
//! Members carry small monotonically-assigned integer ids (max+1 on
//! insert). The seed roster is the twelve-member band lineup the listing
//! pages ship with.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::images::ImageRef;
use crate::stats::{rounded_mean, top_n, RankedLabel};
use crate::store::{EntitySchema, EntityStore, SortKey};

/// A band member record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub age: u32,
    /// Height in centimeters.
    pub height: u32,
    pub image: ImageRef,
    pub bio: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Validated create payload; id and `date_added` are stamped by the store.
#[derive(Debug, Clone)]
pub struct MemberDraft {
    pub name: String,
    pub role: String,
    pub age: u32,
    pub height: u32,
    pub image: ImageRef,
    pub bio: String,
    pub skills: Vec<String>,
}

/// Partial update payload; `None` fields leave the record untouched.
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub age: Option<u32>,
    pub height: Option<u32>,
    pub image: Option<ImageRef>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSortField {
    Name,
    Age,
    Height,
}

/// Aggregate statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub total: usize,
    pub average_age: f64,
    pub average_height: f64,
    pub top_skills: Vec<RankedLabel>,
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub struct MemberSchema;

pub type MemberStore = EntityStore<MemberSchema>;

impl EntitySchema for MemberSchema {
    type Record = Member;
    type Id = u32;
    type Draft = MemberDraft;
    type Patch = MemberPatch;
    type SortField = MemberSortField;

    const STORAGE_KEY: &'static str = "member-store";
    const SCHEMA_VERSION: u32 = 1;
    const COLLECTION_FIELD: &'static str = "members";

    fn seed() -> Vec<Member> {
        seed_members()
    }

    fn id(record: &Member) -> u32 {
        record.id
    }

    fn create(draft: MemberDraft, existing: &[Member]) -> Member {
        let id = existing.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Member {
            id,
            name: draft.name,
            role: Some(draft.role),
            age: draft.age,
            height: draft.height,
            image: draft.image,
            bio: draft.bio,
            skills: draft.skills,
            date_added: Some(Utc::now().to_rfc3339()),
            is_active: Some(true),
        }
    }

    fn apply_patch(record: &mut Member, patch: MemberPatch) {
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(role) = patch.role {
            record.role = Some(role);
        }
        if let Some(age) = patch.age {
            record.age = age;
        }
        if let Some(height) = patch.height {
            record.height = height;
        }
        if let Some(image) = patch.image {
            record.image = image;
        }
        if let Some(bio) = patch.bio {
            record.bio = bio;
        }
        if let Some(skills) = patch.skills {
            record.skills = skills;
        }
        if let Some(is_active) = patch.is_active {
            record.is_active = Some(is_active);
        }
    }

    fn matches(record: &Member, needle: &str) -> bool {
        record.name.to_lowercase().contains(needle)
            || record
                .role
                .as_deref()
                .is_some_and(|role| role.to_lowercase().contains(needle))
            || record.bio.to_lowercase().contains(needle)
            || record
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(needle))
    }

    fn sort_key(record: &Member, field: MemberSortField) -> SortKey {
        match field {
            MemberSortField::Name => SortKey::Text(record.name.clone()),
            MemberSortField::Age => SortKey::Number(f64::from(record.age)),
            MemberSortField::Height => SortKey::Number(f64::from(record.height)),
        }
    }

    fn default_sort_field() -> MemberSortField {
        MemberSortField::Name
    }
}

impl MemberStore {
    /// Members whose role contains `role` (case-insensitive).
    pub fn by_role(&self, role: &str) -> Vec<&Member> {
        let needle = role.to_lowercase();
        self.records()
            .iter()
            .filter(|m| {
                m.role
                    .as_deref()
                    .is_some_and(|r| r.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn stats(&self) -> MemberStats {
        let members = self.records();
        let ages: Vec<f64> = members.iter().map(|m| f64::from(m.age)).collect();
        let heights: Vec<f64> = members.iter().map(|m| f64::from(m.height)).collect();
        MemberStats {
            total: members.len(),
            average_age: rounded_mean(&ages),
            average_height: rounded_mean(&heights),
            top_skills: top_n(
                members
                    .iter()
                    .flat_map(|m| m.skills.iter().map(String::as_str)),
                5,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Seed roster
// ---------------------------------------------------------------------------

fn seed_member(
    id: u32,
    name: &str,
    role: &str,
    age: u32,
    height: u32,
    image: &str,
    bio: &str,
    skills: &[&str],
) -> Member {
    Member {
        id,
        name: name.to_string(),
        role: Some(role.to_string()),
        age,
        height,
        image: ImageRef::new(image),
        bio: bio.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        date_added: Some(Utc::now().to_rfc3339()),
        is_active: Some(true),
    }
}

pub fn seed_members() -> Vec<Member> {
    vec![
        seed_member(
            1,
            "Suho",
            "Leader / Lead Vocal",
            34,
            172,
            "suho",
            "Leader known for stability and vocals.",
            &["Leadership", "Vocal", "MC"],
        ),
        seed_member(
            2,
            "Xiumin",
            "Lead Vocal / Rap",
            35,
            173,
            "xiumin",
            "Energetic performer and versatile vocalist.",
            &["Falsetto", "Dance", "Rap"],
        ),
        seed_member(
            3,
            "Lay",
            "Main Dancer / Vocal",
            33,
            177,
            "lay",
            "Strong dancer with musical composition talent.",
            &["Dance", "Composition", "Production"],
        ),
        seed_member(
            4,
            "Baekhyun",
            "Main Vocal",
            33,
            174,
            "baekhyun",
            "Powerful main vocal with stage presence.",
            &["High Notes", "Stage Presence"],
        ),
        seed_member(
            5,
            "Chen",
            "Main Vocal",
            32,
            173,
            "chen",
            "Known for emotional vocal tone.",
            &["Ballad", "Technique"],
        ),
        seed_member(
            6,
            "Chanyeol",
            "Main Rap / Vocal",
            32,
            186,
            "chanyeol",
            "Rapper and multi-instrument enthusiast.",
            &["Rap", "Guitar", "Production"],
        ),
        seed_member(
            7,
            "D.O.",
            "Main Vocal",
            32,
            172,
            "do",
            "Rich vocal tone and acting talent.",
            &["Vocal", "Acting", "Cooking"],
        ),
        seed_member(
            8,
            "Kai",
            "Main Dancer / Vocal",
            31,
            182,
            "kai",
            "Main dancer with sharp performance style.",
            &["Dance", "Charisma"],
        ),
        seed_member(
            9,
            "Sehun",
            "Lead Dancer / Rap",
            31,
            183,
            "sehun",
            "Maknae with growing performance versatility.",
            &["Rap", "Modeling", "Dance"],
        ),
        seed_member(
            10,
            "Kris",
            "Leader (M) / Rap",
            34,
            187,
            "kris",
            "Former M leader noted for charisma.",
            &["Rap", "Leadership"],
        ),
        seed_member(
            11,
            "Luhan",
            "Lead Vocal / Lead Dancer",
            35,
            178,
            "luhan",
            "Gentle visuals and smooth dance lines.",
            &["Dance", "Vocal"],
        ),
        seed_member(
            12,
            "Tao",
            "Lead Rap / Martial Arts",
            32,
            185,
            "tao",
            "Martial arts flair and intense performance.",
            &["Wushu", "Rap", "Performance"],
        ),
    ]
}
