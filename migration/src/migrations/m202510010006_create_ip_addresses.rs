use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010006_create_ip_addresses"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("ip_addresses"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("ip")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("mac_wlan")).string())
                    .col(
                        ColumnDef::new(Alias::new("connection"))
                            .enumeration(
                                Alias::new("ip_connection"),
                                vec![Alias::new("WIFI"), Alias::new("ETHERNET")],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("ip_status"),
                                vec![
                                    Alias::new("EMPLOYEE"),
                                    Alias::new("GUEST_LAPTOP"),
                                    Alias::new("GUEST_PHONE"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("role"))
                            .enumeration(
                                Alias::new("ip_role"),
                                vec![Alias::new("LIST"), Alias::new("FULL_ACCESS")],
                            )
                            .not_null()
                            .default("LIST"),
                    )
                    .col(ColumnDef::new(Alias::new("company")).string())
                    .col(ColumnDef::new(Alias::new("user_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("asset_assignment_id")).integer())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("ip_addresses"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("ip_addresses"), Alias::new("asset_assignment_id"))
                            .to(Alias::new("asset_assignments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ip_addresses_user_id")
                    .table(Alias::new("ip_addresses"))
                    .col(Alias::new("user_id"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("ip_addresses")).to_owned())
            .await
    }
}
