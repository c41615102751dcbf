use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== CLIENTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Clients::ClientName).string_len(255).not_null())
                    .col(ColumnDef::new(Clients::ClientContact).string_len(20))
                    .col(ColumnDef::new(Clients::ClientEmail).string_len(255))
                    .to_owned(),
            )
            .await?;

        // ========== LOCATIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(Locations::LocationName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Locations::Latitude).double())
                    .col(ColumnDef::new(Locations::Longitude).double())
                    .to_owned(),
            )
            .await?;

        // Case-insensitive unique index backs the get-or-create on order intake
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX locations_name_lower_idx ON locations (LOWER(location_name))",
            )
            .await?;

        // ========== GENERATORS ==========
        manager
            .create_table(
                Table::create()
                    .table(Generators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Generators::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(Generators::GeneratorNo)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Generators::GeneratorSize).integer().not_null())
                    .col(ColumnDef::new(Generators::FuelConsumption).double().not_null())
                    .to_owned(),
            )
            .await?;

        // ========== SITE CONTACTS ==========
        manager
            .create_table(
                Table::create()
                    .table(SiteContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteContacts::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(SiteContacts::SiteContactName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteContacts::SiteContactEmail)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteContacts::SiteContactNumber)
                            .string_len(20)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== INVERTERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Inverters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inverters::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(Inverters::UnitId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Inverters::Model).string_len(255).not_null())
                    .col(ColumnDef::new(Inverters::GivenName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Inverters::GivenStartName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Inverters::SerialNo).string_len(255).not_null())
                    .col(ColumnDef::new(Inverters::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Inverters::Remarks).text())
                    .col(ColumnDef::new(Inverters::VrmInstallationId).string_len(64))
                    .col(ColumnDef::new(Inverters::LocationId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inverters_location")
                            .from(Inverters::Table, Inverters::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inverters_serial_no")
                    .table(Inverters::Table)
                    .col(Inverters::SerialNo)
                    .to_owned(),
            )
            .await?;

        // ========== ORDERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Orders::PoNumber).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::ContractNo).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::IssuedToId).uuid())
                    .col(ColumnDef::new(Orders::LocationId).uuid())
                    .col(ColumnDef::new(Orders::InverterId).uuid())
                    .col(ColumnDef::new(Orders::GeneratorId).uuid())
                    .col(ColumnDef::new(Orders::SiteContactId).uuid())
                    .col(ColumnDef::new(Orders::StartDate).date())
                    .col(ColumnDef::new(Orders::EndDate).date())
                    .col(ColumnDef::new(Orders::PurchaseDate).date())
                    .col(ColumnDef::new(Orders::Remarks).text())
                    .col(ColumnDef::new(Orders::FuelPrice).double().default(1.25))
                    .col(ColumnDef::new(Orders::Co2EmissionPerLitre).double())
                    .col(ColumnDef::new(Orders::CreatedBy).string_len(255))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_client")
                            .from(Orders::Table, Orders::IssuedToId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_location")
                            .from(Orders::Table, Orders::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_inverter")
                            .from(Orders::Table, Orders::InverterId)
                            .to(Inverters::Table, Inverters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_generator")
                            .from(Orders::Table, Orders::GeneratorId)
                            .to(Generators::Table, Generators::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_site_contact")
                            .from(Orders::Table, Orders::SiteContactId)
                            .to(SiteContacts::Table, SiteContacts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_po_number")
                    .table(Orders::Table)
                    .col(Orders::PoNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_inverter_start_date")
                    .table(Orders::Table)
                    .col(Orders::InverterId)
                    .col(Orders::StartDate)
                    .to_owned(),
            )
            .await?;

        // ========== USAGES ==========
        manager
            .create_table(
                Table::create()
                    .table(Usages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Usages::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Usages::InverterId).uuid().not_null())
                    .col(ColumnDef::new(Usages::OrderId).uuid())
                    .col(ColumnDef::new(Usages::IsYard).boolean().not_null().default(false))
                    .col(ColumnDef::new(Usages::Date).date().not_null())
                    .col(ColumnDef::new(Usages::KwConsumed).double().not_null())
                    .col(ColumnDef::new(Usages::GeneratorRunHours).double().not_null())
                    .col(
                        ColumnDef::new(Usages::SiteRunHours)
                            .double()
                            .not_null()
                            .default(24.0),
                    )
                    .col(
                        ColumnDef::new(Usages::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Usages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usages_inverter")
                            .from(Usages::Table, Usages::InverterId)
                            .to(Inverters::Table, Inverters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usages_order")
                            .from(Usages::Table, Usages::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per unit, order, and day; backs ON CONFLICT DO NOTHING on import
        manager
            .create_index(
                Index::create()
                    .name("idx_usages_inverter_order_date")
                    .table(Usages::Table)
                    .col(Usages::InverterId)
                    .col(Usages::OrderId)
                    .col(Usages::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usages_inverter_date")
                    .table(Usages::Table)
                    .col(Usages::InverterId)
                    .col(Usages::Date)
                    .to_owned(),
            )
            .await?;

        // ========== SIM DETAILS ==========
        manager
            .create_table(
                Table::create()
                    .table(SimDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SimDetails::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(SimDetails::InverterId).uuid().not_null())
                    .col(ColumnDef::new(SimDetails::PhoneNumber).string_len(15))
                    .col(ColumnDef::new(SimDetails::SerialNo).string_len(255).not_null())
                    .col(ColumnDef::new(SimDetails::UserNo).string_len(255).not_null())
                    .col(ColumnDef::new(SimDetails::InstallationDate).date().not_null())
                    .col(ColumnDef::new(SimDetails::Remarks).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sim_details_inverter")
                            .from(SimDetails::Table, SimDetails::InverterId)
                            .to(Inverters::Table, Inverters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SERVICE RECORDS ==========
        manager
            .create_table(
                Table::create()
                    .table(ServiceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(ServiceRecords::ServiceTokenNumber)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRecords::InverterId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRecords::DateOfService).date().not_null())
                    .col(ColumnDef::new(ServiceRecords::Problem).text().not_null())
                    .col(
                        ColumnDef::new(ServiceRecords::RepairDone)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRecords::Status).string_len(64))
                    .col(ColumnDef::new(ServiceRecords::DistanceTravelled).string_len(255))
                    .col(ColumnDef::new(ServiceRecords::HoursSpentOnTravel).string_len(255))
                    .col(ColumnDef::new(ServiceRecords::HoursSpentOnSite).string_len(255))
                    .col(ColumnDef::new(ServiceRecords::WarrantyClaim).string_len(255))
                    .col(ColumnDef::new(ServiceRecords::Base).string_len(255))
                    .col(ColumnDef::new(ServiceRecords::ServiceLocation).string_len(255))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_inverter")
                            .from(ServiceRecords::Table, ServiceRecords::InverterId)
                            .to(Inverters::Table, Inverters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== CHECKLISTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Checklists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checklists::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Checklists::InverterId).uuid().not_null())
                    .col(ColumnDef::new(Checklists::TestTimeStart).time())
                    .col(ColumnDef::new(Checklists::TestTimeEnd).time())
                    .col(ColumnDef::new(Checklists::TestTimeMinutes).integer())
                    .col(ColumnDef::new(Checklists::Load).string_len(100))
                    .col(ColumnDef::new(Checklists::BatteryVoltageStart).string_len(20))
                    .col(ColumnDef::new(Checklists::BatteryVoltageEnd).string_len(20))
                    .col(ColumnDef::new(Checklists::VoltageDip).string_len(20))
                    .col(ColumnDef::new(Checklists::UnitStatus).string_len(32).not_null())
                    .col(ColumnDef::new(Checklists::TestedBy).string_len(100).not_null())
                    .col(ColumnDef::new(Checklists::Date).date().not_null())
                    .col(
                        ColumnDef::new(Checklists::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklists_inverter")
                            .from(Checklists::Table, Checklists::InverterId)
                            .to(Inverters::Table, Inverters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== CHECKLIST ITEMS ==========
        manager
            .create_table(
                Table::create()
                    .table(ChecklistItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChecklistItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(ChecklistItems::ChecklistId).uuid().not_null())
                    .col(ColumnDef::new(ChecklistItems::Section).string_len(100).not_null())
                    .col(ColumnDef::new(ChecklistItems::Description).text().not_null())
                    .col(ColumnDef::new(ChecklistItems::Status).string_len(16).not_null())
                    .col(ColumnDef::new(ChecklistItems::Remarks).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checklist_items_checklist")
                            .from(ChecklistItems::Table, ChecklistItems::ChecklistId)
                            .to(Checklists::Table, Checklists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== BATTERY VOLTAGES ==========
        manager
            .create_table(
                Table::create()
                    .table(BatteryVoltages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BatteryVoltages::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(BatteryVoltages::ChecklistId).uuid().not_null())
                    .col(
                        ColumnDef::new(BatteryVoltages::BatteryNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BatteryVoltages::Voltage).string_len(20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_battery_voltages_checklist")
                            .from(BatteryVoltages::Table, BatteryVoltages::ChecklistId)
                            .to(Checklists::Table, Checklists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BatteryVoltages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChecklistItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Checklists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SimDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Usages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inverters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SiteContacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Generators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    ClientName,
    ClientContact,
    ClientEmail,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
    LocationName,
    Latitude,
    Longitude,
}

#[derive(Iden)]
enum Generators {
    Table,
    Id,
    GeneratorNo,
    GeneratorSize,
    FuelConsumption,
}

#[derive(Iden)]
enum SiteContacts {
    Table,
    Id,
    SiteContactName,
    SiteContactEmail,
    SiteContactNumber,
}

#[derive(Iden)]
enum Inverters {
    Table,
    Id,
    UnitId,
    Model,
    GivenName,
    GivenStartName,
    SerialNo,
    Status,
    Remarks,
    VrmInstallationId,
    LocationId,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    PoNumber,
    ContractNo,
    IssuedToId,
    LocationId,
    InverterId,
    GeneratorId,
    SiteContactId,
    StartDate,
    EndDate,
    PurchaseDate,
    Remarks,
    FuelPrice,
    Co2EmissionPerLitre,
    CreatedBy,
}

#[derive(Iden)]
enum Usages {
    Table,
    Id,
    InverterId,
    OrderId,
    IsYard,
    Date,
    KwConsumed,
    GeneratorRunHours,
    SiteRunHours,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SimDetails {
    Table,
    Id,
    InverterId,
    PhoneNumber,
    SerialNo,
    UserNo,
    InstallationDate,
    Remarks,
}

#[derive(Iden)]
enum ServiceRecords {
    Table,
    Id,
    ServiceTokenNumber,
    InverterId,
    DateOfService,
    Problem,
    RepairDone,
    Status,
    DistanceTravelled,
    HoursSpentOnTravel,
    HoursSpentOnSite,
    WarrantyClaim,
    Base,
    ServiceLocation,
}

#[derive(Iden)]
enum Checklists {
    Table,
    Id,
    InverterId,
    TestTimeStart,
    TestTimeEnd,
    TestTimeMinutes,
    Load,
    BatteryVoltageStart,
    BatteryVoltageEnd,
    VoltageDip,
    UnitStatus,
    TestedBy,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum ChecklistItems {
    Table,
    Id,
    ChecklistId,
    Section,
    Description,
    Status,
    Remarks,
}

#[derive(Iden)]
enum BatteryVoltages {
    Table,
    Id,
    ChecklistId,
    BatteryNumber,
    Voltage,
}
