//! Student-portfolio store instance.
//!
//! Students carry globally-unique string ids (UUID v4 for records created
//! through the form; the seed dataset uses its original fixed tokens) and
//! `created_at`/`updated_at` timestamps refreshed on every update. Each
//! student exclusively owns three nested sub-collections — activities,
//! certificates, portfolio projects — replaced wholesale through the parent
//! update flow.
//!
//! The persisted document is schema v2. v1 documents predate the asset
//! re-organization that moved every image under `/image/`; the v1→v2
//! migration rewrites bare image references accordingly (see
//! [`migrate_image_paths`]).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::images::{normalize_image_path, ImageRef};
use crate::persist::Migration;
use crate::stats::{rounded_mean, top_n, RankedLabel};
use crate::store::{EntitySchema, EntityStore, SortKey};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Competition level of an activity award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardLevel {
    School,
    District,
    Province,
    National,
    International,
}

/// A competition or activity entry, owned by one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year: String,
    pub level: AwardLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// A certificate entry, owned by one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year: String,
    pub issuer: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// A portfolio project entry, owned by one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year: String,
    pub category: String,
    pub technology: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

/// A student portfolio record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// Student number, e.g. `6704101333`.
    pub student_id: String,

    // Personal information
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    // Address & contact
    pub address: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,

    // Education
    pub school: String,
    /// Study program, e.g. วิทย์-คณิต.
    pub program: String,
    pub gpa: f64,

    // Abilities & interests
    #[serde(default)]
    pub special_abilities: Vec<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,

    // Application
    pub selected_major: String,
    pub selected_university: String,
    pub application_reason: String,

    // Activities & awards
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub portfolio_projects: Vec<PortfolioProject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<ImageRef>,

    pub created_at: String,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Validated create payload; id and timestamps are stamped by the store.
#[derive(Debug, Clone, Default)]
pub struct StudentDraft {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub birth_date: String,
    pub blood_type: Option<String>,
    pub religion: Option<String>,
    pub ethnicity: Option<String>,
    pub nationality: Option<String>,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub school: String,
    pub program: String,
    pub gpa: f64,
    pub special_abilities: Vec<String>,
    pub hobbies: Vec<String>,
    pub selected_major: String,
    pub selected_university: String,
    pub application_reason: String,
    pub activities: Vec<Activity>,
    pub certificates: Vec<Certificate>,
    pub portfolio_projects: Vec<PortfolioProject>,
    pub profile_image: Option<ImageRef>,
}

/// Partial update payload; `None` fields leave the record untouched.
/// Nested collections are replaced wholesale when present.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub birth_date: Option<String>,
    pub blood_type: Option<String>,
    pub religion: Option<String>,
    pub ethnicity: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub school: Option<String>,
    pub program: Option<String>,
    pub gpa: Option<f64>,
    pub special_abilities: Option<Vec<String>>,
    pub hobbies: Option<Vec<String>>,
    pub selected_major: Option<String>,
    pub selected_university: Option<String>,
    pub application_reason: Option<String>,
    pub activities: Option<Vec<Activity>>,
    pub certificates: Option<Vec<Certificate>>,
    pub portfolio_projects: Option<Vec<PortfolioProject>>,
    pub profile_image: Option<ImageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioSortField {
    FirstName,
    StudentId,
    Gpa,
    SelectedMajor,
}

/// Aggregate statistics for the class overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total: usize,
    pub average_gpa: f64,
    pub top_universities: Vec<RankedLabel>,
    pub top_majors: Vec<RankedLabel>,
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub struct PortfolioSchema;

pub type PortfolioStore = EntityStore<PortfolioSchema>;

impl EntitySchema for PortfolioSchema {
    type Record = Student;
    type Id = String;
    type Draft = StudentDraft;
    type Patch = StudentPatch;
    type SortField = PortfolioSortField;

    const STORAGE_KEY: &'static str = "portfolio-storage";
    const SCHEMA_VERSION: u32 = 2;
    const COLLECTION_FIELD: &'static str = "students";

    fn migrations() -> &'static [Migration] {
        const MIGRATIONS: &[Migration] = &[Migration {
            to_version: 2,
            run: migrate_image_paths,
        }];
        MIGRATIONS
    }

    fn seed() -> Vec<Student> {
        seed_students()
    }

    fn id(record: &Student) -> String {
        record.id.clone()
    }

    fn create(draft: StudentDraft, _existing: &[Student]) -> Student {
        let now = Utc::now().to_rfc3339();
        Student {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: draft.student_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            nickname: draft.nickname,
            birth_date: draft.birth_date,
            blood_type: draft.blood_type,
            religion: draft.religion,
            ethnicity: draft.ethnicity,
            nationality: draft.nationality,
            address: draft.address,
            district: draft.district,
            province: draft.province,
            postal_code: draft.postal_code,
            phone_number: draft.phone_number,
            email: draft.email,
            instagram: draft.instagram,
            facebook: draft.facebook,
            school: draft.school,
            program: draft.program,
            gpa: draft.gpa,
            special_abilities: draft.special_abilities,
            hobbies: draft.hobbies,
            selected_major: draft.selected_major,
            selected_university: draft.selected_university,
            application_reason: draft.application_reason,
            activities: draft.activities,
            certificates: draft.certificates,
            portfolio_projects: draft.portfolio_projects,
            profile_image: draft.profile_image,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn apply_patch(record: &mut Student, patch: StudentPatch) {
        macro_rules! merge {
            ($field:ident) => {
                if let Some(value) = patch.$field {
                    record.$field = value;
                }
            };
            (opt $field:ident) => {
                if patch.$field.is_some() {
                    record.$field = patch.$field;
                }
            };
        }
        merge!(student_id);
        merge!(first_name);
        merge!(last_name);
        merge!(opt nickname);
        merge!(birth_date);
        merge!(opt blood_type);
        merge!(opt religion);
        merge!(opt ethnicity);
        merge!(opt nationality);
        merge!(address);
        merge!(district);
        merge!(province);
        merge!(postal_code);
        merge!(phone_number);
        merge!(opt email);
        merge!(opt instagram);
        merge!(opt facebook);
        merge!(school);
        merge!(program);
        merge!(gpa);
        merge!(special_abilities);
        merge!(hobbies);
        merge!(selected_major);
        merge!(selected_university);
        merge!(application_reason);
        merge!(activities);
        merge!(certificates);
        merge!(portfolio_projects);
        merge!(opt profile_image);
        record.updated_at = Utc::now().to_rfc3339();
    }

    fn matches(record: &Student, needle: &str) -> bool {
        record.first_name.to_lowercase().contains(needle)
            || record.last_name.to_lowercase().contains(needle)
            || record.student_id.contains(needle)
            || record.selected_major.to_lowercase().contains(needle)
            || record.selected_university.to_lowercase().contains(needle)
    }

    fn sort_key(record: &Student, field: PortfolioSortField) -> SortKey {
        match field {
            PortfolioSortField::FirstName => SortKey::Text(record.first_name.clone()),
            PortfolioSortField::StudentId => SortKey::Text(record.student_id.clone()),
            PortfolioSortField::Gpa => SortKey::Number(record.gpa),
            PortfolioSortField::SelectedMajor => SortKey::Text(record.selected_major.clone()),
        }
    }

    fn default_sort_field() -> PortfolioSortField {
        PortfolioSortField::FirstName
    }
}

impl PortfolioStore {
    pub fn stats(&self) -> PortfolioStats {
        let students = self.records();
        let gpas: Vec<f64> = students.iter().map(|s| s.gpa).collect();
        PortfolioStats {
            total: students.len(),
            average_gpa: rounded_mean(&gpas),
            top_universities: top_n(
                students.iter().map(|s| s.selected_university.as_str()),
                5,
            ),
            top_majors: top_n(students.iter().map(|s| s.selected_major.as_str()), 5),
        }
    }
}

// ---------------------------------------------------------------------------
// v1 -> v2 migration
// ---------------------------------------------------------------------------

/// Rewrite v1 image references to carry the `/image/` root.
///
/// Applied uniformly to every activity and certificate image list and the
/// profile image. Records are never dropped, missing sub-collections become
/// empty lists, and fields the migration doesn't recognize pass through
/// untouched. Idempotent: already-rooted paths and `data:` URIs are left
/// alone.
pub fn migrate_image_paths(state: &mut Value) {
    let Some(students) = state.get_mut("students").and_then(Value::as_array_mut) else {
        return;
    };

    for student in students {
        let Some(student) = student.as_object_mut() else {
            continue;
        };

        for key in ["activities", "certificates", "portfolioProjects"] {
            let entry = student.entry(key).or_insert_with(|| Value::Array(Vec::new()));
            if entry.is_null() {
                *entry = Value::Array(Vec::new());
            }
        }

        for key in ["activities", "certificates"] {
            if let Some(items) = student.get_mut(key).and_then(Value::as_array_mut) {
                for item in items {
                    if let Some(images) = item.get_mut("images").and_then(Value::as_array_mut) {
                        for image in images {
                            if let Some(path) = image.as_str() {
                                *image = Value::String(normalize_image_path(path));
                            }
                        }
                    }
                }
            }
        }

        if let Some(profile) = student.get_mut("profileImage") {
            if let Some(path) = profile.as_str() {
                if !path.is_empty() {
                    *profile = Value::String(normalize_image_path(path));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Seed dataset
// ---------------------------------------------------------------------------

const SEED_SCHOOLS: &[&str] = &[
    "โรงเรียนอัสสัมชัญลำปาง",
    "โรงเรียนแม่โจ้วิทยาลัย",
    "โรงเรียนลำปางกัลยาณี",
];
const SEED_PROGRAMS: &[&str] = &["วิทย์-คณิต", "คณิต-อังกฤษ", "ศิลป์-ภาษา"];
const SEED_MAJORS: &[&str] = &[
    "วิทยาศาสตร์คอมพิวเตอร์",
    "วิศวกรรมซอฟต์แวร์",
    "เทคโนโลยีสารสนเทศ",
];
const SEED_UNIVERSITIES: &[&str] = &[
    "มหาวิทยาลัยแม่โจ้",
    "มหาวิทยาลัยเชียงใหม่",
    "จุฬาลงกรณ์มหาวิทยาลัย",
];
const SEED_APPLICATION_REASON: &str = "มีความสนใจในด้านเทคโนโลยีและการพัฒนาซอฟต์แวร์";

/// Class roster the generated seed students derive from: student number,
/// full name (with honorific), GPA.
const CLASS_LIST: &[(&str, &str, f64)] = &[
    ("6104101332", "นายเทพฤทธิ์ จันทะบูลย์", 3.25),
    ("6404101355", "นายกษิดิ์เดช หลักเหมาะ", 2.50),
    ("6404101363", "นายธนาคม ขวัญเงิน", 3.50),
    ("6504101332", "นายทวีวัฒน์ จันทะกี", 2.00),
    ("6704101301", "นายกชณัฐพัฒน์ พลอยเกิด", 3.25),
    ("6704101302", "นายกฤตัชญ์ ถนอมรัตน์", 3.50),
    ("6704101303", "นายกฤษกร ชีวสิทธิรุ่งเรือง", 3.50),
    ("6704101304", "นางสาวกฤษณา โพธา", 1.90),
    ("6704101305", "นายกษาปณ์ ทับแฟง", 2.10),
    ("6704101306", "นายก้องเกียรติ จิรวัฒนคุณากร", 3.50),
    ("6704101307", "นายกันตศักดิ์ ตีฆาอายุ", 3.75),
    ("6704101308", "นายก่า ลุคา", 1.90),
    ("6704101309", "นายกิตติวงศ์ มีจันทร์", 2.75),
    ("6704101310", "นางสาวกุริญา ทาเทร์", 2.00),
    ("6704101311", "นางสาวกุลธิวา เมียกขุนทด", 3.75),
    ("6704101312", "นายเขมโสภณ วงศ์นฤเดชากุล", 2.75),
    ("6704101313", "นายคัมภีร์ ชัยนรานนท์", 2.50),
    ("6704101314", "นายจักรภัทร ชาบัญ", 2.10),
    ("6704101315", "นายจารุวัฒน์ วัจนะรัตน์", 2.10),
    ("6704101316", "นายจิตรภณ พ่วงบุใหญ่", 3.50),
    ("6704101317", "นายจิรายุ วรรณศิลป์", 3.00),
    ("6704101318", "นายชาญณรงค์ เขมารัมย์", 2.75),
    ("6704101319", "นายชินดนัย อยู่เชียร", 2.25),
    ("6704101320", "นายณรงค์พล ชูหนู", 1.90),
    ("6704101321", "นายณัฐกรณ์ เตี้ยกำลังงาม", 2.10),
    ("6704101322", "นายณัฐดนัย กองเสาร์", 2.50),
    ("6704101323", "นายณัฐดนัย ปู่วงษ์", 4.00),
    ("6704101324", "นายณัฐพงษ์ บุญสถิตย์", 2.00),
    ("6704101325", "นายณัฐพล ปัญญาเพิ่ม", 2.20),
    ("6704101326", "นายณัฐภัทร ตันดี", 3.00),
    ("6704101327", "นางสาวณิชากร คัญทัพ", 3.00),
    ("6704101328", "นายติณณภพ พวงมาลา", 2.50),
    ("6704101329", "นายทินภัทร ศรีจันทร์", 4.00),
    ("6704101330", "นายเทวิน จันทร์ใจ", 4.00),
    ("6704101331", "นายธนกฤต เลิศประเสริฐ", 4.00),
    ("6704101332", "นายธนธรณ์ คำต๋อ", 1.90),
    ("6704101334", "นายธนาธิป ทองเปลว", 4.00),
    ("6704101335", "นายธนาวัชร์ ต๊ะทอง", 4.00),
    ("6704101336", "นางสาวธมล นวลหมวก", 2.00),
    ("6704101339", "นายธีระพงษ์ อวดคม", 0.00),
    ("6704101341", "นางสาวนวพร อินธิแสง", 2.40),
    ("6704101342", "นางสาวนัฐฐา จันทร์ปลอด", 3.00),
    ("6704101343", "นายนิตินัย อารมย์ดี", 4.00),
    ("6704101344", "นางสาวนุสรินทร์ สงคุ้ม", 2.75),
    ("6704101345", "นายบุญนุชัย บุญเต็ม", 2.00),
];

/// Split a roster name into given name and surname, stripping the honorific
/// prefix (นางสาว before นาง before นาย — the long form must match first).
fn split_roster_name(full: &str) -> (String, String) {
    let stripped = full
        .strip_prefix("นางสาว")
        .or_else(|| full.strip_prefix("นาง"))
        .or_else(|| full.strip_prefix("นาย"))
        .unwrap_or(full);
    let mut parts = stripped.split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// Deterministically generate a classmate record from a roster row.
///
/// The derivation (last three digits of the student number plus the roster
/// index as a seed for birth date, blood type, school, program, major,
/// university, and phone number) reproduces the dataset the original
/// deployment shipped with.
fn seed_classmate(index: usize, student_id: &str, full_name: &str, gpa: f64) -> Student {
    let (first_name, last_name) = split_roster_name(full_name);
    let last3: usize = student_id
        .get(student_id.len().saturating_sub(3)..)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let seed = last3 + index;
    let now = Utc::now().to_rfc3339();

    Student {
        id: format!("student-{student_id}"),
        student_id: student_id.to_string(),
        first_name,
        last_name,
        nickname: None,
        birth_date: format!(
            "200{}-{:02}-{:02}",
            seed % 5,
            (seed % 12) + 1,
            (seed % 28) + 1
        ),
        blood_type: Some(["A", "B", "AB", "O"][seed % 4].to_string()),
        religion: Some("พุทธ".to_string()),
        ethnicity: Some("ไทย".to_string()),
        nationality: Some("ไทย".to_string()),
        address: format!("บ้านเลขที่ {}/{}", (seed % 999) + 1, (seed % 10) + 1),
        district: "เมือง".to_string(),
        province: "ลำปาง".to_string(),
        postal_code: "52100".to_string(),
        phone_number: format!(
            "0{}{}{}-{:03}-{:04}",
            (seed % 9) + 1,
            (seed * 2) % 9,
            (seed * 3) % 9,
            (seed * 4) % 999,
            (seed * 5) % 9999
        ),
        email: None,
        instagram: None,
        facebook: None,
        school: SEED_SCHOOLS[seed % SEED_SCHOOLS.len()].to_string(),
        program: SEED_PROGRAMS[seed % SEED_PROGRAMS.len()].to_string(),
        gpa,
        special_abilities: Vec::new(),
        hobbies: Vec::new(),
        selected_major: SEED_MAJORS[seed % SEED_MAJORS.len()].to_string(),
        selected_university: SEED_UNIVERSITIES[seed % SEED_UNIVERSITIES.len()].to_string(),
        application_reason: SEED_APPLICATION_REASON.to_string(),
        activities: Vec::new(),
        certificates: Vec::new(),
        portfolio_projects: Vec::new(),
        profile_image: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

/// The fully-detailed lead portfolio the detail page showcases.
fn seed_lead_student() -> Student {
    let now = Utc::now().to_rfc3339();
    Student {
        id: "thannavat-voloshin-001".to_string(),
        student_id: "6704101333".to_string(),
        first_name: "ธนวัต".to_string(),
        last_name: "โวโลชึน".to_string(),
        nickname: Some("ดอนนี".to_string()),
        birth_date: "2002-01-13".to_string(),
        blood_type: Some("O".to_string()),
        religion: Some("พุทธ".to_string()),
        ethnicity: Some("ไทย".to_string()),
        nationality: Some("ไทย".to_string()),
        address: "บ้านเลขที่ 182/1 ถ.บ้านดงพัฒนา".to_string(),
        district: "บ่อแฮ้ว".to_string(),
        province: "ลำปาง".to_string(),
        postal_code: "52100".to_string(),
        phone_number: "096-751-7739".to_string(),
        email: None,
        instagram: Some("donkillmeplz".to_string()),
        facebook: Some("Thannavat Voloshin".to_string()),
        school: "โรงเรียนอัสสัมชัญลำปาง".to_string(),
        program: "วิทย์-คณิต".to_string(),
        gpa: 3.20,
        special_abilities: vec![
            "พูดรัสเซีย".to_string(),
            "เล่นบาสเกตบอล".to_string(),
            "เล่นเทนนิส".to_string(),
            "เล่นเกม".to_string(),
        ],
        hobbies: vec!["เล่นกล้าม".to_string()],
        selected_major: "วิทยาศาสตร์คอมพิวเตอร์".to_string(),
        selected_university: "มหาวิทยาลัยแม่โจ้".to_string(),
        application_reason: SEED_APPLICATION_REASON.to_string(),
        activities: vec![
            Activity {
                id: "act1".to_string(),
                title: "แข่งขัน World Robot Olympiad Thailand 2019".to_string(),
                description: "เข้ารอบ 32 ทีม แข่งขัน WRO ระดับประเทศ".to_string(),
                year: "2019".to_string(),
                level: AwardLevel::National,
                rank: None,
                images: vec![ImageRef::new("/image/act1.png")],
            },
            Activity {
                id: "act2".to_string(),
                title: "รางวัลรองชนะเลิศอันดับที่ 1 ระดับประเทศ".to_string(),
                description: "แข่งขัน Game ROV รายการเครือโรงเรียนอัสสัมชัญทั่วประเทศ".to_string(),
                year: "2019".to_string(),
                level: AwardLevel::National,
                rank: Some("รองชนะเลิศอันดับที่ 1".to_string()),
                images: vec![ImageRef::new("/image/act2.png")],
            },
            Activity {
                id: "act3".to_string(),
                title: "รางวัลรองชนะเลิศอันดับที่ 1 ระดับจังหวัด".to_string(),
                description: "แข่งขัน Game ROV รายการ Young Championship ณ มหาวิทยาลัยราชภัฏลำปาง"
                    .to_string(),
                year: "2019".to_string(),
                level: AwardLevel::Province,
                rank: Some("รองชนะเลิศอันดับที่ 1".to_string()),
                images: vec![ImageRef::new("/image/act3.png")],
            },
            Activity {
                id: "act4".to_string(),
                title: "รางวัลรองชนะเลิศอันดับที่ 2".to_string(),
                description:
                    "แข่งขัน Crossword งานศิลปหัตถกรรมนักเรียน ครั้งที่ 69 ปีการศึกษา 2562 ระดับเขตพื้นที่ สพม.35 ลป.1"
                        .to_string(),
                year: "2019".to_string(),
                level: AwardLevel::District,
                rank: Some("รองชนะเลิศอันดับที่ 2".to_string()),
                images: vec![ImageRef::new("/image/act4.png")],
            },
        ],
        certificates: vec![
            Certificate {
                id: "cer1".to_string(),
                title: "แข่งขัน WRO ระดับประเทศ".to_string(),
                description:
                    "การแข่งขัน World Robot รายการ Robot Olympiad Thailand 2019 เข้ารอบ 32 ทีม"
                        .to_string(),
                year: "2019".to_string(),
                issuer: "Robot Olympiad Thailand".to_string(),
                images: vec![ImageRef::new("/image/cer1.png")],
            },
            Certificate {
                id: "cer2".to_string(),
                title: "รางวัลรองชนะเลิศอันดับที่ 1 ระดับประเทศ".to_string(),
                description: "การแข่งขัน Game ROV รายการเครือโรงเรียนอัสสัมชัญทั่วประเทศ".to_string(),
                year: "2019".to_string(),
                issuer: "เครือโรงเรียนอัสสัมชัญ".to_string(),
                images: vec![ImageRef::new("/image/cer2.png")],
            },
            Certificate {
                id: "cer3".to_string(),
                title: "รางวัลรองชนะเลิศอันดับที่ 2".to_string(),
                description:
                    "การแข่งขัน Crossword งานศิลปหัตถกรรมนักเรียน ครั้งที่ 69 ปีการศึกษา 2562 ระดับเขตพื้นที่ สพม.35 ลป.1"
                        .to_string(),
                year: "2019".to_string(),
                issuer: "สำนักงานเขตพื้นที่การศึกษามัธยมศึกษา เขต 35".to_string(),
                images: vec![ImageRef::new("/image/cer3.png")],
            },
        ],
        portfolio_projects: vec![PortfolioProject {
            id: "portfolio1".to_string(),
            title: "ระบบจัดการ Portfolio TCAS69".to_string(),
            description: "เว็บแอปพลิเคชันสำหรับจัดการ Portfolio นักศึกษา".to_string(),
            year: "2024".to_string(),
            category: "เว็บไซต์".to_string(),
            technology: "Rust, serde, JSON storage".to_string(),
            images: Vec::new(),
        }],
        profile_image: Some(ImageRef::new("/image/รูปนักเรียน.jpg")),
        created_at: now.clone(),
        updated_at: now,
    }
}

fn seed_students() -> Vec<Student> {
    let mut students = vec![seed_lead_student()];
    students.extend(
        CLASS_LIST
            .iter()
            .enumerate()
            .map(|(index, (id, name, gpa))| seed_classmate(index, id, name, *gpa)),
    );
    students
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn open_store() -> PortfolioStore {
        PortfolioStore::open(Box::new(MemoryStorage::new()))
    }

    fn draft(first_name: &str, gpa: f64) -> StudentDraft {
        StudentDraft {
            student_id: "6704101399".to_string(),
            first_name: first_name.to_string(),
            last_name: "ทดสอบ".to_string(),
            birth_date: "2005-06-01".to_string(),
            address: "1/1".to_string(),
            district: "เมือง".to_string(),
            province: "ลำปาง".to_string(),
            postal_code: "52100".to_string(),
            phone_number: "081-000-0000".to_string(),
            school: "โรงเรียนลำปางกัลยาณี".to_string(),
            program: "วิทย์-คณิต".to_string(),
            gpa,
            selected_major: "วิทยาศาสตร์คอมพิวเตอร์".to_string(),
            selected_university: "มหาวิทยาลัยแม่โจ้".to_string(),
            application_reason: "สนใจ".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_seed_contains_lead_and_roster() {
        let store = open_store();
        assert_eq!(store.len(), 1 + CLASS_LIST.len());

        let lead = store.get(&"thannavat-voloshin-001".to_string()).unwrap();
        assert_eq!(lead.activities.len(), 4);
        assert_eq!(lead.certificates.len(), 3);
        assert_eq!(lead.gpa, 3.20);
    }

    #[test]
    fn test_roster_names_drop_honorific() {
        let (first, last) = split_roster_name("นางสาวกฤษณา โพธา");
        assert_eq!(first, "กฤษณา");
        assert_eq!(last, "โพธา");

        let (first, _) = split_roster_name("นายเทพฤทธิ์ จันทะบูลย์");
        assert_eq!(first, "เทพฤทธิ์");
    }

    #[test]
    fn test_seed_generation_is_deterministic() {
        let a = seed_classmate(0, "6104101332", "นายเทพฤทธิ์ จันทะบูลย์", 3.25);
        let b = seed_classmate(0, "6104101332", "นายเทพฤทธิ์ จันทะบูลย์", 3.25);
        assert_eq!(a.birth_date, b.birth_date);
        assert_eq!(a.phone_number, b.phone_number);
        assert_eq!(a.selected_university, b.selected_university);
    }

    #[test]
    fn test_add_assigns_uuid_and_timestamps() {
        let mut store = open_store();
        store.add(draft("สมชาย", 3.25));

        let added = store.records().last().unwrap();
        assert!(uuid::Uuid::parse_str(&added.id).is_ok());
        assert_eq!(added.created_at, added.updated_at);
    }

    #[test]
    fn test_update_refreshes_updated_at_only() {
        let mut store = open_store();
        let id = "thannavat-voloshin-001".to_string();
        let before = store.get(&id).unwrap().clone();

        store.update(&id, StudentPatch { gpa: Some(3.5), ..Default::default() });

        let after = store.get(&id).unwrap();
        assert_eq!(after.gpa, 3.5);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        // Untouched fields survive the merge
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.activities, before.activities);
    }

    #[test]
    fn test_update_replaces_nested_collections_wholesale() {
        let mut store = open_store();
        let id = "thannavat-voloshin-001".to_string();

        store.update(
            &id,
            StudentPatch { activities: Some(Vec::new()), ..Default::default() },
        );

        let after = store.get(&id).unwrap();
        assert!(after.activities.is_empty());
        assert_eq!(after.certificates.len(), 3);
    }

    #[test]
    fn test_search_by_student_id_and_university() {
        let store = open_store();
        assert_eq!(store.search("6704101333").len(), 1);
        assert!(!store.search("เชียงใหม่").is_empty());
    }

    #[test]
    fn test_sorted_by_gpa() {
        let store = open_store();
        let view = store.sorted_view(
            PortfolioSortField::Gpa,
            crate::store::SortDirection::Ascending,
        );
        let gpas: Vec<f64> = view.iter().map(|s| s.gpa).collect();
        assert!(gpas.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(view.len(), store.len());
    }

    #[test]
    fn test_stats_average_and_top_lists() {
        let store = open_store();
        let stats = store.stats();
        assert_eq!(stats.total, store.len());
        assert!(stats.average_gpa > 0.0 && stats.average_gpa <= 4.0);
        assert!(stats.top_universities.len() <= 5);
        assert!(!stats.top_majors.is_empty());
    }

    #[test]
    fn test_stats_on_empty_collection() {
        let mut store = open_store();
        let ids: Vec<String> = store.records().iter().map(|s| s.id.clone()).collect();
        for id in &ids {
            store.delete(id);
        }

        let stats = store.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_gpa, 0.0);
        assert!(stats.top_universities.is_empty());
        assert!(stats.top_majors.is_empty());
    }

    fn legacy_v1_document() -> Value {
        json!({
            "students": [{
                "id": "legacy-1",
                "studentId": "6704101340",
                "firstName": "สมหญิง",
                "lastName": "ใจดี",
                "birthDate": "2004-02-02",
                "address": "2/2",
                "district": "เมือง",
                "province": "ลำปาง",
                "postalCode": "52100",
                "phoneNumber": "080-111-2222",
                "school": "โรงเรียนลำปางกัลยาณี",
                "program": "วิทย์-คณิต",
                "gpa": 3.0,
                "selectedMajor": "วิทยาศาสตร์คอมพิวเตอร์",
                "selectedUniversity": "มหาวิทยาลัยแม่โจ้",
                "applicationReason": "สนใจ",
                "activities": [{
                    "id": "act1",
                    "title": "กิจกรรม",
                    "description": "",
                    "year": "2019",
                    "level": "national",
                    "images": ["act1.png", "image/act2.png", "/image/act3.png"]
                }],
                "certificates": [{
                    "id": "cer1",
                    "title": "เกียรติบัตร",
                    "description": "",
                    "year": "2019",
                    "issuer": "x",
                    "images": ["cer1.png"]
                }],
                "profileImage": "me.jpg",
                "legacyField": "kept",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }]
        })
    }

    #[test]
    fn test_migration_rewrites_bare_filenames() {
        let mut state = legacy_v1_document();
        migrate_image_paths(&mut state);

        let student = &state["students"][0];
        assert_eq!(
            student["activities"][0]["images"],
            json!(["/image/act1.png", "/image/act2.png", "/image/act3.png"])
        );
        assert_eq!(student["certificates"][0]["images"], json!(["/image/cer1.png"]));
        assert_eq!(student["profileImage"], json!("/image/me.jpg"));
        // Missing sub-collections become empty lists
        assert_eq!(student["portfolioProjects"], json!([]));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut once = legacy_v1_document();
        migrate_image_paths(&mut once);
        let mut twice = once.clone();
        migrate_image_paths(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_migration_keeps_unrecognized_fields() {
        let mut state = legacy_v1_document();
        migrate_image_paths(&mut state);
        assert_eq!(state["students"][0]["legacyField"], json!("kept"));
    }

    #[test]
    fn test_open_migrates_v1_document() {
        let mut storage = MemoryStorage::new();
        persist::save_document(
            &mut storage,
            PortfolioSchema::STORAGE_KEY,
            1,
            legacy_v1_document(),
        );

        let store = PortfolioStore::open(Box::new(storage));
        assert_eq!(store.len(), 1);

        let student = store.get(&"legacy-1".to_string()).unwrap();
        assert_eq!(student.activities[0].images[0].as_str(), "/image/act1.png");
        assert_eq!(student.profile_image.as_ref().unwrap().as_str(), "/image/me.jpg");
        assert!(student.portfolio_projects.is_empty());
    }

    #[test]
    fn test_add_then_reload_scenario() {
        let dir = tempfile::tempdir().expect("tempdir");
        let seed_count;
        {
            let storage = crate::storage::DirStorage::open(dir.path()).unwrap();
            let mut store = PortfolioStore::open(Box::new(storage));
            seed_count = store.len() - 1; // about to add one
            store.add(draft("Somchai", 3.25));
        }

        let storage = crate::storage::DirStorage::open(dir.path()).unwrap();
        let reloaded = PortfolioStore::open(Box::new(storage));
        assert_eq!(reloaded.len(), seed_count + 1);

        let added: Vec<&Student> = reloaded
            .records()
            .iter()
            .filter(|s| s.first_name == "Somchai")
            .collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].gpa, 3.25);
        assert!(uuid::Uuid::parse_str(&added[0].id).is_ok());
    }

    #[test]
    fn test_persisted_document_shape() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let storage = crate::storage::DirStorage::open(dir.path()).unwrap();
            let mut store = PortfolioStore::open(Box::new(storage));
            store.add(draft("ทดสอบ", 2.5));
        }

        let raw = std::fs::read_to_string(
            dir.path().join(format!("{}.json", PortfolioSchema::STORAGE_KEY)),
        )
        .expect("document on disk");
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["version"], json!(2));
        assert!(doc["state"]["students"].is_array());
    }
}
