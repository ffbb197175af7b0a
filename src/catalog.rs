//! Static register catalog of the Fröling S3200 / SP Dual controller.
//!
//! Every point the controller exposes over Modbus TCP is described here
//! once, keyed by a stable id. Points are assigned to subsystem groups;
//! [`active_points`] filters the table down to the groups a given
//! installation actually has.

use crate::core::point::{
    DurationParams, EnumTable, Group, PointDefinition, RegisterSpace, ScaledParams, ValueKind,
};

/// Plant operating state, register 34001.
pub static PLANT_STATE: EnumTable = EnumTable {
    entries: &[
        (0, "Dauerlast"),
        (1, "Brauchwasser"),
        (2, "Automatik"),
        (3, "Scheitholzbetr"),
        (4, "Reinigen"),
        (5, "Ausgeschaltet"),
        (6, "Extraheizen"),
        (7, "Kaminkehrer"),
        (8, "Reinigen"),
    ],
};

/// Boiler state machine, register 34002. Labels are the controller's own
/// display strings.
pub static BOILER_STATE: EnumTable = EnumTable {
    entries: &[
        (0, "STÖRUNG"),
        (1, "Kessel Aus"),
        (2, "Anheizen"),
        (3, "Heizen"),
        (4, "Feuererhaltung"),
        (5, "Feuer Aus"),
        (6, "Tür offen"),
        (7, "Vorbereitung"),
        (8, "Vorwärmen"),
        (9, "Zünden"),
        (10, "Abstellen Warten"),
        (11, "Abstellen Warten1"),
        (12, "Abstellen Einschub1"),
        (13, "Abstellen Warten2"),
        (14, "Abstellen Einschub2"),
        (15, "Abreinigen"),
        (16, "2h warten"),
        (17, "Saugen / Heizen"),
        (18, "Fehlzündung"),
        (19, "Betriebsbereit"),
        (20, "Rost schließen"),
        (21, "Stoker leeren"),
        (22, "Vorheizen"),
        (23, "Saugen"),
        (24, "RSE schließen"),
        (25, "RSE öffnen"),
        (26, "Rost kippen"),
        (27, "Vorwärmen-Zünden"),
        (28, "Resteinschub"),
        (29, "Stoker auffüllen"),
        (30, "Lambdasonde aufheizen"),
        (31, "Gebläsenachlauf I"),
        (32, "Gebläsenachlauf II"),
        (33, "Abgestellt"),
        (34, "Nachzünden"),
        (35, "Zünden Warten"),
        (36, "FB: RSE schließen"),
        (37, "FB: Kessel belüften"),
        (38, "FB: Zünden"),
        (39, "FB: min. Einschub"),
        (40, "RSE schließen"),
        (41, "STÖRUNG: STB/NA"),
        (42, "STÖRUNG: Kipprost"),
        (43, "STÖRUNG: FR-Überdr."),
        (44, "STÖRUNG: Türkont."),
        (45, "STÖRUNG: Saugzug"),
        (46, "STÖRUNG: Umfeld"),
        (47, "FEHLER: STB/NA"),
        (48, "FEHLER: Kipprost"),
        (49, "FEHLER: FR-Überdr."),
        (50, "FEHLER: Türkont."),
        (51, "FEHLER: Saugzug"),
        (52, "FEHLER: Umfeld"),
        (53, "FEHLER: Stoker"),
        (54, "STÖRUNG: Stoker"),
        (55, "FB: Stoker leeren"),
        (56, "Vorbelüften"),
        (57, "STÖRUNG: Hackgut"),
        (58, "FEHLER: Hackgut"),
        (59, "NB: Tür offen"),
        (60, "NB: Anheizen"),
        (61, "NB: Heizen"),
        (62, "FEHLER: STB/NA"),
        (63, "FEHLER: Allgemein"),
        (64, "NB: Feuer Aus"),
        (65, "Selbsttest aktiv"),
        (66, "Fehlerbeh. 20min"),
        (67, "FEHLER: Fallschacht"),
        (68, "STÖRUNG: Fallschacht"),
        (69, "Reinigen möglich"),
        (70, "Heizen - Reinigen"),
        (71, "SH Anheizen"),
        (72, "SH Heizen"),
        (73, "SH Heiz/Abstell"),
        (74, "STÖRUNG sicher"),
        (75, "AGR Nachlauf"),
        (76, "AGR reinigen"),
        (77, "Zündung AUS"),
        (78, "Filter reinigen"),
        (79, "Anheizassistent"),
        (80, "SH Zünden"),
        (81, "SH Störung"),
        (82, "Sensorcheck"),
    ],
};

/// Heating-circuit operating mode, registers 48047/48048.
pub static HK_MODE: EnumTable = EnumTable {
    entries: &[
        (0, "off"),
        (1, "auto"),
        (2, "extra"),
        (3, "eco"),
        (4, "eco_permanent"),
        (5, "party"),
    ],
};

/// Fuel selection, register 40441.
pub static FUEL: EnumTable = EnumTable {
    entries: &[(0, "softwood"), (1, "hardwood")],
};

/// Duration registers counted in tenths of an hour, capped at 24 h.
const TENTHS_OF_HOURS: DurationParams = DurationParams {
    units_per_hour: 10,
    max_units: 240,
};

const fn sensor(
    id: &'static str,
    number: u32,
    scale: f64,
    decimals: u32,
    unit: Option<&'static str>,
    group: Group,
) -> PointDefinition {
    PointDefinition {
        id,
        space: RegisterSpace::InputRegister,
        number,
        kind: ValueKind::Scaled(ScaledParams::sensor(scale, decimals)),
        writable: false,
        group,
        unit,
        min_rewrite_secs: None,
    }
}

const fn state(
    id: &'static str,
    number: u32,
    table: &'static EnumTable,
    group: Group,
) -> PointDefinition {
    PointDefinition {
        id,
        space: RegisterSpace::InputRegister,
        number,
        kind: ValueKind::Enum(table),
        writable: false,
        group,
        unit: None,
        min_rewrite_secs: None,
    }
}

const fn flag(id: &'static str, space: RegisterSpace, number: u32, group: Group) -> PointDefinition {
    PointDefinition {
        id,
        space,
        number,
        kind: ValueKind::Bool,
        writable: false,
        group,
        unit: None,
        min_rewrite_secs: None,
    }
}

const fn switch(id: &'static str, number: u32, group: Group) -> PointDefinition {
    PointDefinition {
        id,
        space: RegisterSpace::HoldingRegister,
        number,
        kind: ValueKind::Bool,
        writable: true,
        group,
        unit: None,
        min_rewrite_secs: None,
    }
}

const fn setpoint(
    id: &'static str,
    number: u32,
    params: ScaledParams,
    unit: Option<&'static str>,
    group: Group,
) -> PointDefinition {
    PointDefinition {
        id,
        space: RegisterSpace::HoldingRegister,
        number,
        kind: ValueKind::Scaled(params),
        writable: true,
        group,
        unit,
        min_rewrite_secs: None,
    }
}

const fn select(
    id: &'static str,
    number: u32,
    table: &'static EnumTable,
    group: Group,
) -> PointDefinition {
    PointDefinition {
        id,
        space: RegisterSpace::HoldingRegister,
        number,
        kind: ValueKind::Enum(table),
        writable: true,
        group,
        unit: None,
        min_rewrite_secs: None,
    }
}

const fn clock(id: &'static str, number: u32, writable: bool, group: Group) -> PointDefinition {
    PointDefinition {
        id,
        space: RegisterSpace::HoldingRegister,
        number,
        kind: ValueKind::TimeOfDay,
        writable,
        group,
        unit: None,
        min_rewrite_secs: None,
    }
}

const fn rewrite_after(def: PointDefinition, secs: u64) -> PointDefinition {
    PointDefinition {
        min_rewrite_secs: Some(secs),
        ..def
    }
}

const CELSIUS: Option<&str> = Some("°C");
const PERCENT: Option<&str> = Some("%");
const HOURS: Option<&str> = Some("h");

/// The full register table.
pub static CATALOG: &[PointDefinition] = &[
    // --- Controller ---
    sensor("outside_temperature", 31001, 2.0, 0, CELSIUS, Group::Controller),
    state("plant_state", 34001, &PLANT_STATE, Group::Controller),
    flag("door_contact", RegisterSpace::DiscreteInput, 10001, Group::Controller),
    flag("stb_input", RegisterSpace::DiscreteInput, 10002, Group::Controller),
    flag("emergency_stop_input", RegisterSpace::DiscreteInput, 10003, Group::Controller),
    flag("boiler_release_input", RegisterSpace::DiscreteInput, 10004, Group::Controller),
    // --- Boiler ---
    state("boiler_state", 34002, &BOILER_STATE, Group::Boiler),
    sensor("boiler_temperature", 30001, 2.0, 0, CELSIUS, Group::Boiler),
    sensor("flue_gas_temperature", 30002, 1.0, 0, CELSIUS, Group::Boiler),
    sensor("hours_until_ash_warning", 30087, 1.0, 0, HOURS, Group::Boiler),
    sensor("induced_draught_control", 30013, 1.0, 0, PERCENT, Group::Boiler),
    sensor("induced_draught_speed", 30007, 1.0, 0, Some("rpm"), Group::Boiler),
    sensor("oxygen_controller", 30017, 1.0, 0, PERCENT, Group::Boiler),
    sensor("residual_oxygen", 30004, 10.0, 1, PERCENT, Group::Boiler),
    sensor("return_temperature", 30010, 2.0, 0, CELSIUS, Group::Boiler),
    sensor("primary_air", 30012, 1.0, 0, PERCENT, Group::Boiler),
    sensor("secondary_air", 30014, 1.0, 0, PERCENT, Group::Boiler),
    sensor("operating_hours", 30021, 1.0, 0, HOURS, Group::Boiler),
    sensor("hours_since_service", 30056, 1.0, 0, HOURS, Group::Boiler),
    sensor("fire_preservation_hours", 30025, 1.0, 0, HOURS, Group::Boiler),
    flag("boiler_demand_active", RegisterSpace::InputRegister, 30057, Group::Boiler),
    flag("lambda_auto_calibration", RegisterSpace::HoldingRegister, 43020, Group::Boiler),
    flag("reload_calculation_active", RegisterSpace::HoldingRegister, 42031, Group::Boiler),
    rewrite_after(
        setpoint("boiler_setpoint", 40001, ScaledParams::setpoint(2.0, 0, 70.0, 90.0), CELSIUS, Group::Boiler),
        60,
    ),
    setpoint("circulation_pump_cutoff_temperature", 40601, ScaledParams::setpoint(2.0, 0, 20.0, 120.0), CELSIUS, Group::Boiler),
    select("fuel_selection", 40441, &FUEL, Group::Boiler),
    switch("automatic_ignition", 40136, Group::Boiler),
    // --- Heating circuit 1 ---
    sensor("hk1_flow_temperature", 31031, 2.0, 0, CELSIUS, Group::HeatingCircuit1),
    sensor("hk1_flow_setpoint", 31032, 2.0, 0, CELSIUS, Group::HeatingCircuit1),
    flag("hk1_pump_running", RegisterSpace::Coil, 1031, Group::HeatingCircuit1),
    flag("hk1_dhw_priority", RegisterSpace::HoldingRegister, 41044, Group::HeatingCircuit1),
    flag("hk1_high_temp_request", RegisterSpace::HoldingRegister, 41046, Group::HeatingCircuit1),
    setpoint("hk1_flow_at_plus_10", 41032, ScaledParams::setpoint(2.0, 0, 10.0, 110.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_flow_at_minus_10", 41033, ScaledParams::setpoint(2.0, 0, 10.0, 110.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_pump_off_below_setpoint", 41040, ScaledParams::setpoint(2.0, 0, 10.0, 30.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_eco_reduction", 41034, ScaledParams::setpoint(2.0, 0, 0.0, 70.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_pump_on_below_heating", 41037, ScaledParams::signed_setpoint(2.0, 0, -20.0, 50.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_pump_on_below_eco", 41038, ScaledParams::signed_setpoint(2.0, 0, -20.0, 50.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_frost_protection_temperature", 41039, ScaledParams::setpoint(2.0, 0, 10.0, 20.0), CELSIUS, Group::HeatingCircuit1),
    setpoint("hk1_overheat_protection_temperature", 41048, ScaledParams::setpoint(1.0, 0, 60.0, 120.0), CELSIUS, Group::HeatingCircuit1),
    select("hk1_operating_mode", 48047, &HK_MODE, Group::HeatingCircuit1),
    switch("hk1_release", 48029, Group::HeatingCircuit1),
    // --- Heating circuit 2 ---
    sensor("hk2_flow_temperature", 31061, 2.0, 0, CELSIUS, Group::HeatingCircuit2),
    sensor("hk2_flow_setpoint", 31062, 2.0, 0, CELSIUS, Group::HeatingCircuit2),
    flag("hk2_pump_running", RegisterSpace::Coil, 1061, Group::HeatingCircuit2),
    flag("hk2_dhw_priority", RegisterSpace::HoldingRegister, 41074, Group::HeatingCircuit2),
    flag("hk2_high_temp_request", RegisterSpace::HoldingRegister, 41076, Group::HeatingCircuit2),
    setpoint("hk2_flow_at_plus_10", 41062, ScaledParams::setpoint(2.0, 0, 10.0, 110.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_flow_at_minus_10", 41063, ScaledParams::setpoint(2.0, 0, 10.0, 110.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_pump_off_below_setpoint", 41070, ScaledParams::setpoint(2.0, 0, 10.0, 30.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_eco_reduction", 41064, ScaledParams::setpoint(2.0, 0, 0.0, 70.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_pump_on_below_heating", 41067, ScaledParams::signed_setpoint(2.0, 0, -20.0, 50.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_pump_on_below_eco", 41068, ScaledParams::signed_setpoint(2.0, 0, -20.0, 50.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_frost_protection_temperature", 41069, ScaledParams::signed_setpoint(2.0, 0, -10.0, 20.0), CELSIUS, Group::HeatingCircuit2),
    setpoint("hk2_overheat_protection_temperature", 41079, ScaledParams::setpoint(1.0, 0, 60.0, 120.0), CELSIUS, Group::HeatingCircuit2),
    select("hk2_operating_mode", 48048, &HK_MODE, Group::HeatingCircuit2),
    switch("hk2_release", 48030, Group::HeatingCircuit2),
    // --- Domestic hot water ---
    sensor("dhw_temperature_top", 31631, 2.0, 0, CELSIUS, Group::Dhw),
    sensor("dhw_pump_control", 31633, 1.0, 0, PERCENT, Group::Dhw),
    flag("dhw_residual_heat_use", RegisterSpace::HoldingRegister, 41635, Group::Dhw),
    flag("dhw_charge_once_per_day", RegisterSpace::HoldingRegister, 41636, Group::Dhw),
    flag("dhw_legionella_heating", RegisterSpace::HoldingRegister, 41637, Group::Dhw),
    rewrite_after(
        setpoint("dhw_setpoint", 41632, ScaledParams::setpoint(2.0, 0, 10.0, 100.0), CELSIUS, Group::Dhw),
        60,
    ),
    rewrite_after(
        setpoint("dhw_reload_below", 41633, ScaledParams::setpoint(2.0, 0, 1.0, 90.0), CELSIUS, Group::Dhw),
        60,
    ),
    // --- Buffer ---
    sensor("buffer_temperature_top", 32001, 2.0, 0, CELSIUS, Group::Buffer),
    sensor("buffer_temperature_middle", 32002, 2.0, 0, CELSIUS, Group::Buffer),
    sensor("buffer_temperature_bottom", 32003, 2.0, 0, CELSIUS, Group::Buffer),
    sensor("buffer_pump_control", 32004, 1.0, 0, PERCENT, Group::Buffer),
    sensor("buffer_charge_level", 32007, 1.0, 0, PERCENT, Group::Buffer),
    flag("buffer_residual_heat_use", RegisterSpace::HoldingRegister, 42002, Group::Buffer),
    flag("buffer_middle_control", RegisterSpace::HoldingRegister, 42014, Group::Buffer),
    flag("buffer_finish_at_middle", RegisterSpace::HoldingRegister, 42015, Group::Buffer),
    flag("buffer_demand_by_system", RegisterSpace::HoldingRegister, 42025, Group::Buffer),
    flag("buffer_hygienic_storage", RegisterSpace::HoldingRegister, 42030, Group::Buffer),
    // --- Pellet discharge ---
    sensor("pellet_hopper_level", 30022, 207.0, 1, PERCENT, Group::Discharge),
    sensor("pellet_counter_kg", 30082, 1.0, 0, Some("kg"), Group::Discharge),
    sensor("pellet_counter_t", 30083, 1.0, 0, Some("t"), Group::Discharge),
    sensor("pellet_consumption_total", 30084, 10.0, 0, Some("t"), Group::Discharge),
    setpoint("pellet_store_remaining", 40320, ScaledParams::setpoint(10.0, 1, 0.0, 100.0), Some("t"), Group::Discharge),
    switch("pellet_discharge_disabled", 40265, Group::Discharge),
    clock("pellet_fill_1_start", 40062, true, Group::Discharge),
    clock("pellet_fill_2_start", 40095, false, Group::Discharge),
    PointDefinition {
        id: "buffer_charge_delay_after_log_wood",
        space: RegisterSpace::HoldingRegister,
        number: 40252,
        kind: ValueKind::Duration(TENTHS_OF_HOURS),
        writable: true,
        group: Group::Discharge,
        unit: None,
        min_rewrite_secs: None,
    },
    // --- Circulation pump ---
    sensor("circulation_return_temperature", 30712, 2.0, 0, CELSIUS, Group::Circulation),
    sensor("dhw_flow_switch", 30601, 2.0, 0, None, Group::Circulation),
    sensor("circulation_pump_speed", 30711, 1.0, 0, PERCENT, Group::Circulation),
];

/// All catalog entries.
pub fn all() -> &'static [PointDefinition] {
    CATALOG
}

/// Look up a point by id.
pub fn find(id: &str) -> Option<&'static PointDefinition> {
    CATALOG.iter().find(|def| def.id == id)
}

/// Catalog entries belonging to the enabled groups, in table order.
pub fn active_points(groups: &[Group]) -> Vec<&'static PointDefinition> {
    CATALOG
        .iter()
        .filter(|def| groups.contains(&def.group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for def in all() {
            assert!(seen.insert(def.id), "duplicate point id {}", def.id);
        }
    }

    #[test]
    fn test_numbers_fit_their_space() {
        for def in all() {
            assert!(
                def.number >= def.space.base(),
                "{} number below space base",
                def.id
            );
            assert!(
                def.number - def.space.base() <= u16::MAX as u32,
                "{} offset exceeds u16",
                def.id
            );
        }
    }

    #[test]
    fn test_writes_only_in_holding_space() {
        for def in all() {
            if def.writable {
                assert!(
                    def.space.accepts_writes(),
                    "{} is writable outside the holding space",
                    def.id
                );
            }
        }
    }

    #[test]
    fn test_known_wire_offsets() {
        assert_eq!(find("boiler_setpoint").unwrap().wire_offset(), 0);
        assert_eq!(find("hk1_dhw_priority").unwrap().wire_offset(), 1043);
        assert_eq!(find("boiler_demand_active").unwrap().wire_offset(), 56);
        assert_eq!(find("door_contact").unwrap().wire_offset(), 0);
        // Coil points keep the raw wire offsets the controller documents.
        assert_eq!(find("hk1_pump_running").unwrap().wire_offset(), 1030);
        assert_eq!(find("hk2_pump_running").unwrap().wire_offset(), 1060);
    }

    #[test]
    fn test_group_filter() {
        let boiler_only = active_points(&[Group::Boiler]);
        assert!(!boiler_only.is_empty());
        assert!(boiler_only.iter().all(|def| def.group == Group::Boiler));

        let everything = active_points(&Group::ALL);
        assert_eq!(everything.len(), all().len());

        assert!(active_points(&[]).is_empty());
    }

    #[test]
    fn test_state_tables_are_dense() {
        // The boiler state machine is documented as codes 0..=82.
        assert_eq!(BOILER_STATE.entries.len(), 83);
        for (i, (code, _)) in BOILER_STATE.entries.iter().enumerate() {
            assert_eq!(*code as usize, i);
        }
        assert_eq!(PLANT_STATE.entries.len(), 9);
    }

    #[test]
    fn test_scaled_resolution_per_register_map() {
        fn scaled(id: &str) -> ScaledParams {
            match find(id).unwrap().kind {
                ValueKind::Scaled(params) => params,
                _ => panic!("{id} is not a scaled point"),
            }
        }

        // Temperatures report whole degrees even though the register
        // holds half-degree steps.
        assert_eq!((scaled("boiler_temperature").scale, scaled("boiler_temperature").decimals), (2.0, 0));
        assert_eq!((scaled("outside_temperature").scale, scaled("outside_temperature").decimals), (2.0, 0));
        assert_eq!((scaled("boiler_setpoint").scale, scaled("boiler_setpoint").decimals), (2.0, 0));
        assert_eq!((scaled("dhw_setpoint").scale, scaled("dhw_setpoint").decimals), (2.0, 0));

        // The few tenth-resolution points keep one decimal.
        assert_eq!((scaled("residual_oxygen").scale, scaled("residual_oxygen").decimals), (10.0, 1));
        assert_eq!((scaled("pellet_hopper_level").scale, scaled("pellet_hopper_level").decimals), (207.0, 1));
        assert_eq!((scaled("pellet_store_remaining").scale, scaled("pellet_store_remaining").decimals), (10.0, 1));

        // The total consumption counter reports whole tonnes.
        assert_eq!((scaled("pellet_consumption_total").scale, scaled("pellet_consumption_total").decimals), (10.0, 0));
    }

    #[test]
    fn test_rewrite_guard_on_setpoints() {
        assert_eq!(find("boiler_setpoint").unwrap().min_rewrite_secs, Some(60));
        assert_eq!(find("dhw_setpoint").unwrap().min_rewrite_secs, Some(60));
        assert_eq!(find("boiler_temperature").unwrap().min_rewrite_secs, None);
    }
}
