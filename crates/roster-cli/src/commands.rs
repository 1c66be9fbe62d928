//! One-shot subcommands: each loads the collection, runs one store
//! operation and reports the result as text.

use anyhow::{Result, bail};
use chrono::Local;
use clap::Args;
use roster_core::{
  EntityKind,
  form::{Confirmation, DeletePrompt, MemberForm},
  gateway::EntityGateway,
};
use roster_store::{BrowseState, CollectionStore, Notice, Notices, Outcome};
use uuid::Uuid;

use crate::render;

/// Member fields settable from the command line. Unset flags leave the
/// form untouched; an empty value clears an optional field.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
  /// Full name.
  #[arg(long)]
  pub name:           Option<String>,
  /// Internship role or designation.
  #[arg(long)]
  pub position:       Option<String>,
  /// Work email.
  #[arg(long)]
  pub email:          Option<String>,
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub start:          Option<String>,
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub end:            Option<String>,
  #[arg(long)]
  pub personal_email: Option<String>,
  #[arg(long)]
  pub phone:          Option<String>,
  #[arg(long, value_name = "URL")]
  pub photo:          Option<String>,
  #[arg(long, value_name = "URL")]
  pub linkedin:       Option<String>,
  #[arg(long, value_name = "URL")]
  pub twitter:        Option<String>,
  #[arg(long, value_name = "URL")]
  pub github:         Option<String>,
  /// Hide from the public website.
  #[arg(long)]
  pub hidden:         bool,
  /// Show on the public website.
  #[arg(long, conflicts_with = "hidden")]
  pub visible:        bool,
}

impl FieldArgs {
  pub fn apply(self, form: &mut MemberForm) {
    let slots = [
      (self.name, &mut form.name),
      (self.position, &mut form.position),
      (self.email, &mut form.contact_email),
      (self.start, &mut form.start_date),
      (self.end, &mut form.end_date),
      (self.personal_email, &mut form.personal_email),
      (self.phone, &mut form.contact_number),
      (self.photo, &mut form.photo_url),
      (self.linkedin, &mut form.linked_in),
      (self.twitter, &mut form.twitter),
      (self.github, &mut form.github),
    ];
    for (value, slot) in slots {
      if let Some(value) = value {
        *slot = value;
      }
    }
    if self.hidden {
      form.is_visible = false;
    }
    if self.visible {
      form.is_visible = true;
    }
  }
}

/// A store plus the receiving end of its notices.
pub struct Runner<G> {
  store:   CollectionStore<G>,
  notices: Notices,
  kind:    EntityKind,
}

impl<G: EntityGateway> Runner<G> {
  pub fn new(store: CollectionStore<G>, notices: Notices, kind: EntityKind) -> Self {
    Self { store, notices, kind }
  }

  fn drain(&mut self) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(n) = self.notices.try_recv() {
      out.push(n);
    }
    out
  }

  /// Turn `outcome` into printable text, or an error carrying the notices
  /// and field errors that explain it.
  fn finish(&mut self, outcome: Outcome, mut out: String) -> Result<String> {
    let notices: Vec<String> = self.drain().iter().map(render::notice).collect();
    match outcome {
      Outcome::Applied => {
        for line in notices {
          out.push_str(&line);
          out.push('\n');
        }
        Ok(out)
      }
      Outcome::Invalid(errors) => {
        bail!("the {} was not saved:\n{}", self.kind.noun(), render::field_errors(&errors))
      }
      Outcome::Failed(err) if notices.is_empty() => bail!("{err}"),
      Outcome::Failed(err) => bail!("{} ({err})", notices.join("\n")),
      Outcome::Skipped => bail!("nothing was changed"),
    }
  }

  async fn load(&mut self) -> Result<()> {
    match self.store.load().await {
      Outcome::Applied => Ok(()),
      other => self.finish(other, String::new()).map(drop),
    }
  }

  async fn require(&mut self, id: Uuid) -> Result<roster_core::Member> {
    self.load().await?;
    match self.store.get(id).await {
      Some(member) => Ok(member),
      None => bail!("no {} with id {id}", self.kind.noun()),
    }
  }

  pub async fn list(&mut self, search: Option<String>, page: usize) -> Result<String> {
    self.load().await?;
    let mut browse = BrowseState::new();
    if let Some(search) = search {
      browse.set_search(search);
    }
    let first = self.store.page(&browse).await;
    browse.go_to(page, first.page_count);
    let view = self.store.page(&browse).await;
    Ok(render::page(self.kind, browse.search(), &view))
  }

  pub async fn add(&mut self, fields: FieldArgs) -> Result<String> {
    let mut form = MemberForm::blank(Local::now().date_naive());
    fields.apply(&mut form);
    let outcome = self.store.create(&form).await;
    let created = self.store.members().await.into_iter().next();
    let summary = match (&outcome, created) {
      (Outcome::Applied, Some(member)) => render::member(self.kind, &member),
      _ => String::new(),
    };
    self.finish(outcome, summary)
  }

  pub async fn edit(&mut self, id: Uuid, fields: FieldArgs) -> Result<String> {
    let member = self.require(id).await?;
    let mut form = MemberForm::from_member(&member);
    fields.apply(&mut form);
    let outcome = self.store.update(id, &form).await;
    let summary = match (&outcome, self.store.get(id).await) {
      (Outcome::Applied, Some(member)) => render::member(self.kind, &member),
      _ => String::new(),
    };
    self.finish(outcome, summary)
  }

  /// Remove `id` once `confirm` agrees to the prompt.
  pub async fn delete(
    &mut self,
    id: Uuid,
    confirm: impl FnOnce(&DeletePrompt) -> Result<bool>,
  ) -> Result<String> {
    let member = self.require(id).await?;
    let prompt = DeletePrompt::new(&member);
    let decision = if confirm(&prompt)? { prompt.confirm() } else { prompt.cancel() };
    match decision {
      Confirmation::Confirmed(intent) => {
        let outcome = self.store.delete(intent).await;
        self.finish(outcome, String::new())
      }
      Confirmation::Cancelled => Ok("Cancelled.\n".to_owned()),
    }
  }

  pub async fn toggle(&mut self, id: Uuid) -> Result<String> {
    self.require(id).await?;
    let outcome = self.store.toggle_visibility(id).await;
    self.finish(outcome, String::new())
  }
}

#[cfg(test)]
mod tests {
  use roster_core::memory::MemoryDirectory;

  use super::*;

  fn runner() -> (Runner<MemoryDirectory>, MemoryDirectory) {
    let directory = MemoryDirectory::with_demo_data();
    let (store, notices) = CollectionStore::new(directory.clone(), EntityKind::Interns);
    (Runner::new(store, notices, EntityKind::Interns), directory)
  }

  fn fields() -> FieldArgs {
    FieldArgs {
      name: Some("Nisha Rai".into()),
      position: Some("QA Intern".into()),
      email: Some("nisha@leafclutch.com".into()),
      ..FieldArgs::default()
    }
  }

  async fn first_id(directory: &MemoryDirectory) -> Uuid {
    directory.list(EntityKind::Interns).await.unwrap()[0].id
  }

  #[test]
  fn field_args_override_only_what_is_set() {
    let mut form = MemberForm::blank(Local::now().date_naive());
    form.twitter = "https://x.com/old".into();
    FieldArgs { end: Some("2024-09-01".into()), hidden: true, ..fields() }.apply(&mut form);
    assert_eq!(form.name, "Nisha Rai");
    assert_eq!(form.end_date, "2024-09-01");
    assert_eq!(form.twitter, "https://x.com/old");
    assert!(!form.is_visible);
  }

  #[tokio::test]
  async fn list_searches_and_pages() {
    let (mut r, _) = runner();
    let text = r.list(Some("sharma".into()), 1).await.unwrap();
    assert!(text.contains("Priya Sharma"));
    assert!(!text.contains("Aman Gupta"));

    let text = r.list(None, 9).await.unwrap();
    assert!(text.contains("page 1/1"));
  }

  #[tokio::test]
  async fn add_prints_record_and_notice() {
    let (mut r, directory) = runner();
    let text = r.add(fields()).await.unwrap();
    assert!(text.contains("Nisha Rai"));
    assert!(text.contains("[ok] New intern added!"));
    assert_eq!(directory.len(EntityKind::Interns).await, 5);
  }

  #[tokio::test]
  async fn add_reports_field_errors() {
    let (mut r, directory) = runner();
    let err = r
      .add(FieldArgs { github: Some("github.com/nisha".into()), ..FieldArgs::default() })
      .await
      .unwrap_err()
      .to_string();
    assert!(err.contains("name:"));
    assert!(err.contains("github:"));
    assert_eq!(directory.len(EntityKind::Interns).await, 4);
  }

  #[tokio::test]
  async fn edit_changes_one_field() {
    let (mut r, directory) = runner();
    let id = first_id(&directory).await;
    let text = r
      .edit(id, FieldArgs { position: Some("Platform Intern".into()), ..FieldArgs::default() })
      .await
      .unwrap();
    assert!(text.contains("Changes saved successfully!"));
    let stored = directory.get(EntityKind::Interns, id).await.unwrap();
    assert_eq!(stored.position, "Platform Intern");
  }

  #[tokio::test]
  async fn edit_unknown_id_fails() {
    let (mut r, _) = runner();
    let err = r.edit(Uuid::new_v4(), FieldArgs::default()).await.unwrap_err();
    assert!(err.to_string().starts_with("no intern with id"));
  }

  #[tokio::test]
  async fn delete_respects_answer() {
    let (mut r, directory) = runner();
    let id = first_id(&directory).await;

    let text = r.delete(id, |_| Ok(false)).await.unwrap();
    assert_eq!(text, "Cancelled.\n");
    assert_eq!(directory.len(EntityKind::Interns).await, 4);

    let text = r
      .delete(id, |prompt| {
        assert!(prompt.question().contains("Aman Gupta"));
        Ok(true)
      })
      .await
      .unwrap();
    assert!(text.contains("[removed] Intern removed."));
    assert_eq!(directory.len(EntityKind::Interns).await, 3);
  }

  #[tokio::test]
  async fn toggle_flips_visibility() {
    let (mut r, directory) = runner();
    let id = first_id(&directory).await;
    let before = directory.get(EntityKind::Interns, id).await.unwrap().is_visible;
    r.toggle(id).await.unwrap();
    let after = directory.get(EntityKind::Interns, id).await.unwrap().is_visible;
    assert_ne!(before, after);
  }
}
