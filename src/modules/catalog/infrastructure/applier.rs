/// Change Applier
///
/// Materializes an approved contribution's payload into its target catalog
/// table. Dispatch is a single match on the subject type; each arm creates or
/// updates one table. The applier runs on the caller's connection so the
/// whole approve-and-apply sequence shares one transaction; any error here
/// rolls that transaction back.
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::modules::catalog::domain::{
    parse_fields, GenreFields, MediaFields, PersonFields, StudioFields,
};
use crate::modules::moderation::domain::{ContributionPayload, SubjectType};
use crate::shared::errors::{AppError, AppResult};

pub trait ChangeApplier: Send + Sync {
    /// Create (subject_id None) or update (subject_id Some) the target
    /// entity. Returns the entity id, newly minted on creation so the caller
    /// can back-fill the work item's subject reference.
    fn apply(
        &self,
        conn: &mut PgConnection,
        subject_type: SubjectType,
        subject_id: Option<Uuid>,
        payload: &ContributionPayload,
    ) -> AppResult<Uuid>;
}

pub struct CatalogApplier;

impl CatalogApplier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatalogApplier {
    fn default() -> Self {
        Self::new()
    }
}

// The seven media tables share one column set, as do the three person
// tables. Diesel queries are statically typed per table, so the per-table
// functions are generated rather than hand-copied.
macro_rules! media_applier {
    ($fn_name:ident, $table:ident) => {
        fn $fn_name(
            conn: &mut PgConnection,
            subject_id: Option<Uuid>,
            fields: &MediaFields,
        ) -> AppResult<Uuid> {
            use crate::schema::$table::dsl;

            match subject_id {
                Some(id) => {
                    let updated = diesel::update(dsl::$table.find(id))
                        .set((
                            fields.title.as_ref().map(|v| dsl::title.eq(v)),
                            fields.synopsis.as_ref().map(|v| dsl::synopsis.eq(v)),
                            fields.release_year.map(|v| dsl::release_year.eq(v)),
                            fields.unit_count.map(|v| dsl::unit_count.eq(v)),
                            fields.cover_url.as_ref().map(|v| dsl::cover_url.eq(v)),
                            dsl::updated_at.eq(Utc::now()),
                        ))
                        .execute(conn)?;
                    if updated == 0 {
                        return Err(AppError::ApplyFailure(format!(
                            "Target {} entity {} does not exist",
                            stringify!($table),
                            id
                        )));
                    }
                    Ok(id)
                }
                None => {
                    let title = fields.title.as_ref().ok_or_else(|| {
                        AppError::ApplyFailure(
                            "A new entity contribution must propose a title".to_string(),
                        )
                    })?;
                    let id = Uuid::new_v4();
                    diesel::insert_into(dsl::$table)
                        .values((
                            dsl::id.eq(id),
                            dsl::title.eq(title),
                            fields.synopsis.as_ref().map(|v| dsl::synopsis.eq(v)),
                            fields.release_year.map(|v| dsl::release_year.eq(v)),
                            fields.unit_count.map(|v| dsl::unit_count.eq(v)),
                            fields.cover_url.as_ref().map(|v| dsl::cover_url.eq(v)),
                        ))
                        .execute(conn)?;
                    Ok(id)
                }
            }
        }
    };
}

macro_rules! person_applier {
    ($fn_name:ident, $table:ident) => {
        fn $fn_name(
            conn: &mut PgConnection,
            subject_id: Option<Uuid>,
            fields: &PersonFields,
        ) -> AppResult<Uuid> {
            use crate::schema::$table::dsl;

            match subject_id {
                Some(id) => {
                    let updated = diesel::update(dsl::$table.find(id))
                        .set((
                            fields.name.as_ref().map(|v| dsl::name.eq(v)),
                            fields.biography.as_ref().map(|v| dsl::biography.eq(v)),
                            fields.image_url.as_ref().map(|v| dsl::image_url.eq(v)),
                            dsl::updated_at.eq(Utc::now()),
                        ))
                        .execute(conn)?;
                    if updated == 0 {
                        return Err(AppError::ApplyFailure(format!(
                            "Target {} entity {} does not exist",
                            stringify!($table),
                            id
                        )));
                    }
                    Ok(id)
                }
                None => {
                    let name = fields.name.as_ref().ok_or_else(|| {
                        AppError::ApplyFailure(
                            "A new entity contribution must propose a name".to_string(),
                        )
                    })?;
                    let id = Uuid::new_v4();
                    diesel::insert_into(dsl::$table)
                        .values((
                            dsl::id.eq(id),
                            dsl::name.eq(name),
                            fields.biography.as_ref().map(|v| dsl::biography.eq(v)),
                            fields.image_url.as_ref().map(|v| dsl::image_url.eq(v)),
                        ))
                        .execute(conn)?;
                    Ok(id)
                }
            }
        }
    };
}

media_applier!(apply_anime, anime);
media_applier!(apply_manga, manga);
media_applier!(apply_novel, novels);
media_applier!(apply_donghua, donghua);
media_applier!(apply_manhua, manhua);
media_applier!(apply_manhwa, manhwa);
media_applier!(apply_fan_comic, fan_comics);

person_applier!(apply_character, characters);
person_applier!(apply_staff, staff_members);
person_applier!(apply_voice_actor, voice_actors);

fn apply_studio(
    conn: &mut PgConnection,
    subject_id: Option<Uuid>,
    fields: &StudioFields,
) -> AppResult<Uuid> {
    use crate::schema::studios::dsl;

    match subject_id {
        Some(id) => {
            let updated = diesel::update(dsl::studios.find(id))
                .set((
                    fields.name.as_ref().map(|v| dsl::name.eq(v)),
                    fields.description.as_ref().map(|v| dsl::description.eq(v)),
                    dsl::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Err(AppError::ApplyFailure(format!(
                    "Target studio {} does not exist",
                    id
                )));
            }
            Ok(id)
        }
        None => {
            let name = fields.name.as_ref().ok_or_else(|| {
                AppError::ApplyFailure("A new studio contribution must propose a name".to_string())
            })?;
            let id = Uuid::new_v4();
            diesel::insert_into(dsl::studios)
                .values((
                    dsl::id.eq(id),
                    dsl::name.eq(name),
                    fields.description.as_ref().map(|v| dsl::description.eq(v)),
                ))
                .execute(conn)?;
            Ok(id)
        }
    }
}

fn apply_genre(
    conn: &mut PgConnection,
    subject_id: Option<Uuid>,
    fields: &GenreFields,
) -> AppResult<Uuid> {
    use crate::schema::genres::dsl;

    match subject_id {
        Some(id) => {
            let name = fields.name.as_ref().ok_or_else(|| {
                AppError::ApplyFailure("A genre contribution must propose a name".to_string())
            })?;
            let updated = diesel::update(dsl::genres.find(id))
                .set(dsl::name.eq(name))
                .execute(conn)?;
            if updated == 0 {
                return Err(AppError::ApplyFailure(format!(
                    "Target genre {} does not exist",
                    id
                )));
            }
            Ok(id)
        }
        None => {
            let name = fields.name.as_ref().ok_or_else(|| {
                AppError::ApplyFailure("A new genre contribution must propose a name".to_string())
            })?;
            let id = Uuid::new_v4();
            diesel::insert_into(dsl::genres)
                .values((dsl::id.eq(id), dsl::name.eq(name)))
                .execute(conn)?;
            Ok(id)
        }
    }
}

impl ChangeApplier for CatalogApplier {
    fn apply(
        &self,
        conn: &mut PgConnection,
        subject_type: SubjectType,
        subject_id: Option<Uuid>,
        payload: &ContributionPayload,
    ) -> AppResult<Uuid> {
        match subject_type {
            SubjectType::Anime => apply_anime(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::Manga => apply_manga(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::Novel => apply_novel(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::Donghua => {
                apply_donghua(conn, subject_id, &parse_fields(&payload.fields)?)
            }
            SubjectType::Manhua => apply_manhua(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::Manhwa => apply_manhwa(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::FanComic => {
                apply_fan_comic(conn, subject_id, &parse_fields(&payload.fields)?)
            }
            SubjectType::Character => {
                apply_character(conn, subject_id, &parse_fields(&payload.fields)?)
            }
            SubjectType::Staff => apply_staff(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::VoiceActor => {
                apply_voice_actor(conn, subject_id, &parse_fields(&payload.fields)?)
            }
            SubjectType::Studio => apply_studio(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::Genre => apply_genre(conn, subject_id, &parse_fields(&payload.fields)?),
            SubjectType::Review | SubjectType::User => Err(AppError::ApplyFailure(format!(
                "Subject type '{}' is not a catalog entity",
                subject_type
            ))),
        }
    }
}
