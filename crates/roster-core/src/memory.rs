//! In-memory [`EntityGateway`], the backing store of the JSON server and
//! the offline demo mode.

use std::{collections::HashMap, sync::Arc};

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
  error::GatewayError,
  gateway::EntityGateway,
  kind::EntityKind,
  member::{Member, MemberPatch, SocialMedia},
};

/// Members per collection, in insertion order.
///
/// Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
  collections: Arc<RwLock<HashMap<EntityKind, Vec<Member>>>>,
}

impl MemoryDirectory {
  pub fn new() -> Self { Self::default() }

  /// A directory pre-populated with the demo interns.
  pub fn with_demo_data() -> Self {
    let mut collections = HashMap::new();
    collections.insert(EntityKind::Interns, demo_interns());
    collections.insert(EntityKind::Teams, Vec::new());
    Self { collections: Arc::new(RwLock::new(collections)) }
  }

  pub async fn len(&self, kind: EntityKind) -> usize {
    self.collections.read().await.get(&kind).map_or(0, Vec::len)
  }

  pub async fn get(&self, kind: EntityKind, id: Uuid) -> Option<Member> {
    let collections = self.collections.read().await;
    collections.get(&kind)?.iter().find(|m| m.id == id).cloned()
  }
}

fn not_found(id: Uuid) -> GatewayError {
  GatewayError::Rejected { status: 404, message: format!("member {id} not found") }
}

fn invalid(message: String) -> GatewayError {
  GatewayError::Rejected { status: 400, message }
}

impl EntityGateway for MemoryDirectory {
  async fn list(&self, kind: EntityKind) -> Result<Vec<Member>, GatewayError> {
    Ok(self.collections.read().await.get(&kind).cloned().unwrap_or_default())
  }

  async fn create(
    &self,
    kind: EntityKind,
    patch: MemberPatch,
  ) -> Result<Member, GatewayError> {
    let id = patch.id.unwrap_or_else(Uuid::new_v4);
    let now = Utc::now();
    let member = Member::from_patch(id, patch, now.date_naive(), now);
    member.check().map_err(|e| invalid(e.to_string()))?;

    let mut collections = self.collections.write().await;
    let members = collections.entry(kind).or_default();
    if members.iter().any(|m| m.id == id) {
      return Err(GatewayError::Rejected {
        status:  409,
        message: format!("member {id} already exists"),
      });
    }
    members.insert(0, member.clone());
    tracing::debug!(%kind, %id, "member created");
    Ok(member)
  }

  async fn update(
    &self,
    kind: EntityKind,
    id: Uuid,
    patch: MemberPatch,
  ) -> Result<Member, GatewayError> {
    let mut collections = self.collections.write().await;
    let slot = collections
      .get_mut(&kind)
      .and_then(|members| members.iter_mut().find(|m| m.id == id))
      .ok_or_else(|| not_found(id))?;

    let mut updated = slot.clone();
    updated.apply(&patch, Utc::now());
    updated.check().map_err(|e| invalid(e.to_string()))?;
    *slot = updated.clone();
    tracing::debug!(%kind, %id, "member updated");
    Ok(updated)
  }

  async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), GatewayError> {
    let mut collections = self.collections.write().await;
    let members = collections.get_mut(&kind).ok_or_else(|| not_found(id))?;
    let before = members.len();
    members.retain(|m| m.id != id);
    if members.len() == before {
      return Err(not_found(id));
    }
    tracing::debug!(%kind, %id, "member deleted");
    Ok(())
  }
}

// ─── Demo data ───────────────────────────────────────────────────────────────

struct Demo {
  name:           &'static str,
  position:       &'static str,
  seed:           &'static str,
  email:          &'static str,
  personal:       &'static str,
  phone:          &'static str,
  visible:        bool,
  start:          (i32, u32, u32),
  end:            Option<(i32, u32, u32)>,
  linked_in:      Option<&'static str>,
  github:         Option<&'static str>,
  twitter:        Option<&'static str>,
}

const DEMO: [Demo; 4] = [
  Demo {
    name:      "Aman Gupta",
    position:  "Frontend Developer",
    seed:      "Aman",
    email:     "aman@leafclutch.com",
    personal:  "aman.dev@gmail.com",
    phone:     "+91 98765 43210",
    visible:   true,
    start:     (2025, 12, 1),
    end:       Some((2026, 6, 1)),
    linked_in: Some("https://linkedin.com/in/aman"),
    github:    Some("https://github.com/aman"),
    twitter:   Some("https://twitter.com/aman"),
  },
  Demo {
    name:      "Sanya Malhotra",
    position:  "UI/UX Designer",
    seed:      "Sanya",
    email:     "sanya@leafclutch.com",
    personal:  "sanya.design@gmail.com",
    phone:     "+91 98221 12233",
    visible:   true,
    start:     (2026, 1, 2),
    end:       None,
    linked_in: Some("https://linkedin.com/in/sanya"),
    github:    Some("https://github.com/sanya"),
    twitter:   None,
  },
  Demo {
    name:      "Rahul Verma",
    position:  "Backend Intern",
    seed:      "Rahul",
    email:     "rahul@leafclutch.com",
    personal:  "rahul.v@outlook.com",
    phone:     "+91 77665 54433",
    visible:   false,
    start:     (2025, 11, 15),
    end:       Some((2026, 2, 15)),
    linked_in: None,
    github:    Some("https://github.com/rahul"),
    twitter:   None,
  },
  Demo {
    name:      "Priya Sharma",
    position:  "Data Analyst",
    seed:      "Priya",
    email:     "priya@leafclutch.com",
    personal:  "priya.data@gmail.com",
    phone:     "+91 99887 76655",
    visible:   true,
    start:     (2026, 1, 10),
    end:       None,
    linked_in: Some("https://linkedin.com/in/priya"),
    github:    None,
    twitter:   Some("https://twitter.com/priya"),
  },
];

fn ymd((y, m, d): (i32, u32, u32)) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(y, m, d)
}

/// The four sample interns shown by the offline demo.
pub fn demo_interns() -> Vec<Member> {
  let now = Utc::now();
  DEMO
    .iter()
    .filter_map(|d| {
      Some(Member {
        id:             Uuid::new_v4(),
        photo_url:      format!(
          "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
          d.seed
        ),
        name:           d.name.to_owned(),
        position:       d.position.to_owned(),
        start_date:     ymd(d.start)?,
        end_date:       d.end.and_then(ymd),
        social_media:   SocialMedia {
          linked_in: d.linked_in.map(str::to_owned),
          twitter:   d.twitter.map(str::to_owned),
          github:    d.github.map(str::to_owned),
        },
        contact_email:  d.email.to_owned(),
        personal_email: Some(d.personal.to_owned()),
        contact_number: Some(d.phone.to_owned()),
        is_visible:     d.visible,
        created_at:     now,
        updated_at:     now,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn patch(name: &str) -> MemberPatch {
    MemberPatch {
      name: Some(name.into()),
      position: Some("Intern".into()),
      contact_email: Some("x@y.z".into()),
      ..MemberPatch::default()
    }
  }

  #[tokio::test]
  async fn create_keeps_client_id_and_lists_it() {
    let dir = MemoryDirectory::new();
    let id = Uuid::new_v4();
    let created = dir
      .create(EntityKind::Teams, MemberPatch { id: Some(id), ..patch("Neha") })
      .await
      .unwrap();
    assert_eq!(created.id, id);

    let listed = dir.list(EntityKind::Teams).await.unwrap();
    assert_eq!(listed, vec![created]);
    assert!(dir.list(EntityKind::Interns).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn newest_member_is_listed_first() {
    let dir = MemoryDirectory::with_demo_data();
    let created = dir.create(EntityKind::Interns, patch("Kiran")).await.unwrap();
    let listed = dir.list(EntityKind::Interns).await.unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[0], created);
    assert_eq!(listed[1].name, "Aman Gupta");
  }

  #[tokio::test]
  async fn duplicate_id_conflicts() {
    let dir = MemoryDirectory::new();
    let id = Uuid::new_v4();
    dir
      .create(EntityKind::Teams, MemberPatch { id: Some(id), ..patch("A") })
      .await
      .unwrap();
    let err = dir
      .create(EntityKind::Teams, MemberPatch { id: Some(id), ..patch("B") })
      .await
      .unwrap_err();
    assert!(matches!(err, GatewayError::Rejected { status: 409, .. }));
  }

  #[tokio::test]
  async fn update_rejects_broken_invariants_without_committing() {
    let dir = MemoryDirectory::new();
    let m = dir.create(EntityKind::Interns, patch("Kiran")).await.unwrap();
    let err = dir
      .update(
        EntityKind::Interns,
        m.id,
        MemberPatch { name: Some(String::new()), ..MemberPatch::default() },
      )
      .await
      .unwrap_err();
    assert!(matches!(err, GatewayError::Rejected { status: 400, .. }));
    assert_eq!(dir.get(EntityKind::Interns, m.id).await.unwrap().name, "Kiran");
  }

  #[tokio::test]
  async fn missing_ids_are_404() {
    let dir = MemoryDirectory::with_demo_data();
    let id = Uuid::new_v4();
    assert!(dir.delete(EntityKind::Interns, id).await.unwrap_err().is_not_found());
    assert!(
      dir
        .update(EntityKind::Interns, id, MemberPatch::visibility(true))
        .await
        .unwrap_err()
        .is_not_found()
    );
  }

  #[tokio::test]
  async fn demo_data_is_seeded() {
    let dir = MemoryDirectory::with_demo_data();
    let interns = dir.list(EntityKind::Interns).await.unwrap();
    assert_eq!(interns.len(), 4);
    assert_eq!(interns[0].name, "Aman Gupta");
    assert!(!interns[2].is_visible);
    assert!(interns.iter().all(|m| m.check().is_ok()));
  }
}
