//! Migration: Feature tables - mapping, skills, MCP registry, query samples,
//! schema metadata.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MappingProjects::Table)
                    .col(
                        ColumnDef::new(MappingProjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MappingProjects::Name).string().not_null())
                    .col(
                        ColumnDef::new(MappingProjects::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(MappingProjects::OwnerId).uuid().null())
                    .col(
                        ColumnDef::new(MappingProjects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MappingProjects::Table, MappingProjects::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MappingDocuments::Table)
                    .col(
                        ColumnDef::new(MappingDocuments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MappingDocuments::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(MappingDocuments::Filename).string().not_null())
                    .col(
                        ColumnDef::new(MappingDocuments::StoredPath)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MappingDocuments::ContentType)
                            .string()
                            .not_null()
                            .default("application/octet-stream"),
                    )
                    .col(
                        ColumnDef::new(MappingDocuments::SizeBytes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MappingDocuments::UploaderId).uuid().null())
                    .col(
                        ColumnDef::new(MappingDocuments::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MappingDocuments::Table, MappingDocuments::ProjectId)
                            .to(MappingProjects::Table, MappingProjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MappingDocuments::Table, MappingDocuments::UploaderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .col(ColumnDef::new(Skills::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Skills::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Skills::Category).string().not_null())
                    .col(ColumnDef::new(Skills::Tags).text().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Skills::Prerequisites)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Skills::Steps).text().not_null().default("[]"))
                    .col(
                        ColumnDef::new(Skills::Examples)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Skills::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Skills::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Skills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Skills::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(McpServers::Table)
                    .col(ColumnDef::new(McpServers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(McpServers::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(McpServers::Transport).string().not_null())
                    .col(ColumnDef::new(McpServers::Command).string().null())
                    .col(ColumnDef::new(McpServers::Args).text().not_null().default("[]"))
                    .col(ColumnDef::new(McpServers::Env).text().not_null().default("{}"))
                    .col(ColumnDef::new(McpServers::BaseUrl).string().null())
                    .col(
                        ColumnDef::new(McpServers::Headers)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(McpServers::Enabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(McpServers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(McpServers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuerySamples::Table)
                    .col(
                        ColumnDef::new(QuerySamples::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuerySamples::Question).text().not_null())
                    .col(ColumnDef::new(QuerySamples::SqlText).text().not_null())
                    .col(ColumnDef::new(QuerySamples::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(QuerySamples::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuerySamples::Table, QuerySamples::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SchemaTables::Table)
                    .col(
                        ColumnDef::new(SchemaTables::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SchemaTables::TableName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SchemaTables::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SchemaColumns::Table)
                    .col(
                        ColumnDef::new(SchemaColumns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SchemaColumns::TableId).uuid().not_null())
                    .col(ColumnDef::new(SchemaColumns::ColumnName).string().not_null())
                    .col(ColumnDef::new(SchemaColumns::DataType).string().not_null())
                    .col(
                        ColumnDef::new(SchemaColumns::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SchemaColumns::Table, SchemaColumns::TableId)
                            .to(SchemaTables::Table, SchemaTables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            SchemaColumns::Table.into_iden(),
            SchemaTables::Table.into_iden(),
            QuerySamples::Table.into_iden(),
            McpServers::Table.into_iden(),
            Skills::Table.into_iden(),
            MappingDocuments::Table.into_iden(),
            MappingProjects::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum MappingProjects {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum MappingDocuments {
    Table,
    Id,
    ProjectId,
    Filename,
    StoredPath,
    ContentType,
    SizeBytes,
    UploaderId,
    UploadedAt,
}

#[derive(Iden)]
enum Skills {
    Table,
    Id,
    Name,
    Category,
    Tags,
    Prerequisites,
    Steps,
    Examples,
    Status,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum McpServers {
    Table,
    Id,
    Name,
    Transport,
    Command,
    Args,
    Env,
    BaseUrl,
    Headers,
    Enabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum QuerySamples {
    Table,
    Id,
    Question,
    SqlText,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum SchemaTables {
    Table,
    Id,
    TableName,
    Description,
}

#[derive(Iden)]
enum SchemaColumns {
    Table,
    Id,
    TableId,
    ColumnName,
    DataType,
    Description,
}
