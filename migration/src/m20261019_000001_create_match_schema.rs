use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(id_col(Events::Id))
                    .col(ColumnDef::new(Events::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Events::Date).date().not_null())
                    .col(timestamp_col(Events::CreatedAt))
                    .col(timestamp_col(Events::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Videos::Table)
                    .if_not_exists()
                    .col(id_col(Videos::Id))
                    .col(ColumnDef::new(Videos::EventId).integer().not_null())
                    .col(ColumnDef::new(Videos::Filename).string_len(255).not_null())
                    .col(ColumnDef::new(Videos::FilePath).string_len(500).not_null())
                    .col(ColumnDef::new(Videos::DurationSeconds).decimal_len(10, 4))
                    .col(ColumnDef::new(Videos::FileSizeBytes).big_integer())
                    .col(timestamp_col(Videos::UploadedAt))
                    .col(timestamp_col(Videos::CreatedAt))
                    .col(timestamp_col(Videos::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videos_event_id")
                            .from(Videos::Table, Videos::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actions::Table)
                    .if_not_exists()
                    .col(id_col(Actions::Id))
                    .col(ColumnDef::new(Actions::Code).string_len(20).not_null())
                    .col(ColumnDef::new(Actions::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Actions::Points).integer().not_null())
                    .col(
                        ColumnDef::new(Actions::Ordering)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp_col(Actions::CreatedAt))
                    .col(timestamp_col(Actions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Analyses::Table)
                    .if_not_exists()
                    .col(id_col(Analyses::Id))
                    .col(ColumnDef::new(Analyses::EventId).integer().not_null())
                    .col(ColumnDef::new(Analyses::VideoId).integer().not_null())
                    .col(ColumnDef::new(Analyses::Team).string_len(100).not_null())
                    .col(ColumnDef::new(Analyses::Match).string_len(100).not_null())
                    .col(ColumnDef::new(Analyses::Notes).text())
                    .col(timestamp_col(Analyses::CreatedAt))
                    .col(timestamp_col(Analyses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_analyses_event_id")
                            .from(Analyses::Table, Analyses::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_analyses_video_id")
                            .from(Analyses::Table, Analyses::VideoId)
                            .to(Videos::Table, Videos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(id_col(Marks::Id))
                    .col(ColumnDef::new(Marks::AnalysisId).integer().not_null())
                    .col(ColumnDef::new(Marks::ActionId).integer().not_null())
                    .col(
                        ColumnDef::new(Marks::TimeSeconds)
                            .decimal_len(10, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Marks::DeltaSeconds)
                            .decimal_len(10, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Marks::IsFailure)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Marks::Count).integer().not_null().default(1))
                    .col(timestamp_col(Marks::CreatedAt))
                    .col(timestamp_col(Marks::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_marks_analysis_id")
                            .from(Marks::Table, Marks::AnalysisId)
                            .to(Analyses::Table, Analyses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_marks_action_id")
                            .from(Marks::Table, Marks::ActionId)
                            .to(Actions::Table, Actions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("actions_code_key")
                    .table(Actions::Table)
                    .col(Actions::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_videos_event_id")
                    .table(Videos::Table)
                    .col(Videos::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_analyses_event_id")
                    .table(Analyses::Table)
                    .col(Analyses::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_analyses_video_id")
                    .table(Analyses::Table)
                    .col(Analyses::VideoId)
                    .to_owned(),
            )
            .await?;

        // Marks are always read back per analysis in time order
        manager
            .create_index(
                Index::create()
                    .name("idx_marks_analysis_time")
                    .table(Marks::Table)
                    .col(Marks::AnalysisId)
                    .col(Marks::TimeSeconds)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Marks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Analyses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Date,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Videos {
    Table,
    Id,
    EventId,
    Filename,
    FilePath,
    DurationSeconds,
    FileSizeBytes,
    UploadedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Actions {
    Table,
    Id,
    Code,
    Name,
    Points,
    Ordering,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Analyses {
    Table,
    Id,
    EventId,
    VideoId,
    Team,
    Match,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Marks {
    Table,
    Id,
    AnalysisId,
    ActionId,
    TimeSeconds,
    DeltaSeconds,
    IsFailure,
    Count,
    CreatedAt,
    UpdatedAt,
}
