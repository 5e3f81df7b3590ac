use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DrawingDiary::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawingDiary::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DrawingDiary::ImageUrl)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DrawingDiary::ImageTitle)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DrawingDiary::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Emotion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Emotion::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Emotion::TotalScore).integer().not_null())
                    .col(
                        ColumnDef::new(Emotion::ComfortableScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Emotion::HappyScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Emotion::SadScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Emotion::JoyfulScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Emotion::AnnoyedScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Emotion::LethargicScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Emotion::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReportSummary::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportSummary::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportSummary::Contents).text().not_null())
                    .col(
                        ColumnDef::new(ReportSummary::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Tags).json().not_null())
                    .col(
                        ColumnDef::new(Tags::ReportSummaryId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tags::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_report_summary")
                            .from(Tags::Table, Tags::ReportSummaryId)
                            .to(ReportSummary::Table, ReportSummary::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tags_report_summary_id")
                    .table(Tags::Table)
                    .col(Tags::ReportSummaryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Report::ConversationId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Report::SnowflakeId).big_integer().not_null())
                    .col(ColumnDef::new(Report::EmotionId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Report::ReportSummaryId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Report::DrawingDiaryId)
                            .string_len(36)
                            .null(),
                    )
                    .col(ColumnDef::new(Report::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Report::DeletedAt).date_time().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_conversation")
                            .from(Report::Table, Report::ConversationId)
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_emotion")
                            .from(Report::Table, Report::EmotionId)
                            .to(Emotion::Table, Emotion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_report_summary")
                            .from(Report::Table, Report::ReportSummaryId)
                            .to(ReportSummary::Table, ReportSummary::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_drawing_diary")
                            .from(Report::Table, Report::DrawingDiaryId)
                            .to(DrawingDiary::Table, DrawingDiary::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate report creation for one conversation must fail at the
        // schema level, not just in the check-then-create path.
        manager
            .create_index(
                Index::create()
                    .name("idx_report_conversation_id")
                    .table(Report::Table)
                    .col(Report::ConversationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_snowflake_id")
                    .table(Report::Table)
                    .col(Report::SnowflakeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_created_at")
                    .table(Report::Table)
                    .col(Report::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReportSummary::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Emotion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DrawingDiary::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Conversations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum DrawingDiary {
    Table,
    Id,
    ImageUrl,
    ImageTitle,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Emotion {
    Table,
    Id,
    TotalScore,
    ComfortableScore,
    HappyScore,
    SadScore,
    JoyfulScore,
    AnnoyedScore,
    LethargicScore,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ReportSummary {
    Table,
    Id,
    Contents,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Tags,
    ReportSummaryId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Report {
    Table,
    Id,
    ConversationId,
    SnowflakeId,
    EmotionId,
    ReportSummaryId,
    DrawingDiaryId,
    CreatedAt,
    DeletedAt,
}
