use super::ArgKind::{
    Bool as B, ControlPoints as N, Double as D, Int as I, Pose as P, Text as S,
};
use super::{ArgKind, CanonSpec, RetKind};

const NINE_AXES: &[ArgKind] = &[D, D, D, D, D, D, D, D, D];
const LINE_AND_NINE_AXES: &[ArgKind] = &[I, D, D, D, D, D, D, D, D, D];

const fn unit(name: &'static str, args: &'static [ArgKind]) -> CanonSpec {
    CanonSpec::new(name, args, RetKind::Unit)
}

const fn query(name: &'static str, returns: RetKind) -> CanonSpec {
    CanonSpec::new(name, &[], returns)
}

/// Every canon primitive reachable from `CanonMod`, sorted by name
pub static BOUND: &[CanonSpec] = &[
    unit("ARC_FEED", &[I, D, D, D, D, I, D, D, D, D, D, D, D]),
    unit("CHANGE_TOOL", &[I]),
    unit("CHANGE_TOOL_NUMBER", &[I]),
    unit("CLAMP_AXIS", &[I]),
    unit("CLEAR_AUX_OUTPUT_BIT", &[I]),
    unit("CLEAR_MOTION_OUTPUT_BIT", &[I]),
    unit("COMMENT", &[S]),
    unit("DISABLE_ADAPTIVE_FEED", &[]),
    unit("DISABLE_FEED_HOLD", &[]),
    unit("DISABLE_FEED_OVERRIDE", &[]),
    unit("DISABLE_SPEED_OVERRIDE", &[]),
    unit("DWELL", &[D]),
    unit("ENABLE_ADAPTIVE_FEED", &[]),
    unit("ENABLE_FEED_HOLD", &[]),
    unit("ENABLE_FEED_OVERRIDE", &[]),
    unit("ENABLE_SPEED_OVERRIDE", &[]),
    unit("FINISH", &[]),
    unit("FLOOD_OFF", &[]),
    unit("FLOOD_ON", &[]),
    query("GET_BLOCK_DELETE", RetKind::Bool),
    query("GET_EXTERNAL_ADAPTIVE_FEED_ENABLE", RetKind::Int),
    CanonSpec::new("GET_EXTERNAL_ANALOG_INPUT", &[I, D], RetKind::Double),
    query("GET_EXTERNAL_ANGLE_UNITS", RetKind::Double),
    query("GET_EXTERNAL_AXIS_MASK", RetKind::Int),
    CanonSpec::new("GET_EXTERNAL_DIGITAL_INPUT", &[I, I], RetKind::Int),
    query("GET_EXTERNAL_FEED_HOLD_ENABLE", RetKind::Int),
    query("GET_EXTERNAL_FEED_OVERRIDE_ENABLE", RetKind::Int),
    query("GET_EXTERNAL_FEED_RATE", RetKind::Double),
    query("GET_EXTERNAL_FLOOD", RetKind::Int),
    query("GET_EXTERNAL_LENGTH_UNITS", RetKind::Double),
    query("GET_EXTERNAL_MIST", RetKind::Int),
    query("GET_EXTERNAL_MOTION_CONTROL_MODE", RetKind::Int),
    query("GET_EXTERNAL_MOTION_CONTROL_TOLERANCE", RetKind::Double),
    query("GET_EXTERNAL_PARAMETER_FILE_NAME", RetKind::Text),
    query("GET_EXTERNAL_PLANE", RetKind::Int),
    query("GET_EXTERNAL_POCKETS_MAX", RetKind::Int),
    query("GET_EXTERNAL_POSITION_A", RetKind::Double),
    query("GET_EXTERNAL_POSITION_B", RetKind::Double),
    query("GET_EXTERNAL_POSITION_C", RetKind::Double),
    query("GET_EXTERNAL_POSITION_U", RetKind::Double),
    query("GET_EXTERNAL_POSITION_V", RetKind::Double),
    query("GET_EXTERNAL_POSITION_W", RetKind::Double),
    query("GET_EXTERNAL_POSITION_X", RetKind::Double),
    query("GET_EXTERNAL_POSITION_Y", RetKind::Double),
    query("GET_EXTERNAL_POSITION_Z", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_A", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_B", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_C", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_U", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_V", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_W", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_X", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_Y", RetKind::Double),
    query("GET_EXTERNAL_PROBE_POSITION_Z", RetKind::Double),
    query("GET_EXTERNAL_PROBE_TRIPPED_VALUE", RetKind::Int),
    query("GET_EXTERNAL_PROBE_VALUE", RetKind::Double),
    query("GET_EXTERNAL_QUEUE_EMPTY", RetKind::Int),
    query("GET_EXTERNAL_SELECTED_TOOL_SLOT", RetKind::Int),
    query("GET_EXTERNAL_SPEED", RetKind::Double),
    query("GET_EXTERNAL_SPINDLE", RetKind::Int),
    query("GET_EXTERNAL_SPINDLE_OVERRIDE_ENABLE", RetKind::Int),
    query("GET_EXTERNAL_TC_FAULT", RetKind::Int),
    query("GET_EXTERNAL_TOOL_LENGTH_AOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_BOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_COFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_UOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_VOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_WOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_XOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_YOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_LENGTH_ZOFFSET", RetKind::Double),
    query("GET_EXTERNAL_TOOL_SLOT", RetKind::Int),
    CanonSpec::new("GET_EXTERNAL_TOOL_TABLE", &[I], RetKind::Tool),
    query("GET_EXTERNAL_TRAVERSE_RATE", RetKind::Double),
    query("GET_OPTIONAL_PROGRAM_STOP", RetKind::Bool),
    unit("INIT_CANON", &[]),
    unit("INTERP_ABORT", &[I, S]),
    unit("LOCK_ROTARY", &[I, I]),
    unit("LOG", &[S]),
    unit("LOGAPPEND", &[S]),
    unit("LOGCLOSE", &[]),
    unit("LOGOPEN", &[S]),
    unit("MESSAGE", &[S]),
    unit("MIST_OFF", &[]),
    unit("MIST_ON", &[]),
    unit("NURBS_FEED", &[I, N, I]),
    unit("OPTIONAL_PROGRAM_STOP", &[]),
    unit("PALLET_SHUTTLE", &[]),
    unit("PROGRAM_END", &[]),
    unit("PROGRAM_STOP", &[]),
    unit("RIGID_TAP", &[I, D, D, D]),
    unit("SELECT_PLANE", &[I]),
    unit("SELECT_POCKET", &[I, I]),
    unit("SET_AUX_OUTPUT_BIT", &[I]),
    unit("SET_AUX_OUTPUT_VALUE", &[I, D]),
    unit("SET_BLOCK_DELETE", &[B]),
    unit("SET_CUTTER_RADIUS_COMPENSATION", &[D]),
    unit("SET_FEED_MODE", &[I]),
    unit("SET_FEED_RATE", &[D]),
    unit("SET_G5X_OFFSET", &[I, D, D, D, D, D, D, D, D, D]),
    unit("SET_G92_OFFSET", NINE_AXES),
    unit("SET_MOTION_OUTPUT_BIT", &[I]),
    unit("SET_MOTION_OUTPUT_VALUE", &[I, D]),
    unit("SET_NAIVECAM_TOLERANCE", &[D]),
    unit("SET_OPTIONAL_PROGRAM_STOP", &[B]),
    unit("SET_SPINDLE_MODE", &[D]),
    unit("SET_SPINDLE_SPEED", &[D]),
    unit("SET_TOOL_TABLE_ENTRY", &[I, I, P, D, D, D, I]),
    unit("SET_TRAVERSE_RATE", &[D]),
    unit("SET_XY_ROTATION", &[D]),
    unit("SPINDLE_RETRACT", &[]),
    unit("SPINDLE_RETRACT_TRAVERSE", &[]),
    unit("START_CHANGE", &[]),
    unit("START_CUTTER_RADIUS_COMPENSATION", &[I]),
    unit("START_SPEED_FEED_SYNCH", &[D, B]),
    unit("START_SPINDLE_CLOCKWISE", &[]),
    unit("START_SPINDLE_COUNTERCLOCKWISE", &[]),
    unit("STOP_CUTTER_RADIUS_COMPENSATION", &[]),
    unit("STOP_SPEED_FEED_SYNCH", &[]),
    unit("STOP_SPINDLE_TURNING", &[]),
    unit("STRAIGHT_FEED", LINE_AND_NINE_AXES),
    unit("STRAIGHT_PROBE", &[I, D, D, D, D, D, D, D, D, D, I]),
    unit("STRAIGHT_TRAVERSE", LINE_AND_NINE_AXES),
    unit("TURN_PROBE_OFF", &[]),
    unit("TURN_PROBE_ON", &[]),
    unit("UNLOCK_ROTARY", &[I, I]),
    unit("USE_LENGTH_UNITS", &[I]),
    unit("USE_NO_SPINDLE_FORCE", &[]),
    unit("USE_TOOL_LENGTH_OFFSET", &[P]),
    CanonSpec::new("WAIT", &[I, I, I, D], RetKind::Int),
];

/// Canon primitives deliberately left out of `CanonMod`
pub static OMITTED: &[&str] = &[
    "CANON_UPDATE_END_POINT",
    "GET_EXTERNAL_ANGLE_UNIT_FACTOR",
    "GET_EXTERNAL_LENGTH_UNIT_FACTOR",
    "GET_EXTERNAL_ORIGIN_A",
    "GET_EXTERNAL_ORIGIN_B",
    "GET_EXTERNAL_ORIGIN_C",
    "GET_EXTERNAL_ORIGIN_X",
    "GET_EXTERNAL_ORIGIN_Y",
    "GET_EXTERNAL_ORIGIN_Z",
    "LOCK_SPINDLE_Z",
    "NURB_CONTROL_POINT",
    "NURB_FEED",
    "NURB_KNOT_VECTOR",
    "ORIENT_SPINDLE",
    "SET_FEED_REFERENCE",
    "SET_MOTION_CONTROL_MODE",
    "STOP",
    "UNCLAMP_AXIS",
    "USER_DEFINED_FUNCTION_ADD",
    "USE_SPINDLE_FORCE",
    "XYZ",
];

/// Find a bound primitive by name
pub fn lookup(name: &str) -> Option<&'static CanonSpec> {
    BOUND
        .binary_search_by(|spec| spec.name.cmp(name))
        .ok()
        .map(|index| &BOUND[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_table_is_sorted_and_unique() {
        for pair in BOUND.windows(2) {
            assert!(
                pair[0].name < pair[1].name,
                "{} must sort before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn test_omitted_names_are_not_bound() {
        for name in OMITTED {
            assert!(lookup(name).is_none(), "{} should not be bound", name);
        }
    }

    #[test]
    fn test_motion_signatures() {
        assert_eq!(lookup("STRAIGHT_FEED").map(CanonSpec::arity), Some(10));
        assert_eq!(lookup("ARC_FEED").map(CanonSpec::arity), Some(13));
        assert_eq!(lookup("WAIT").map(|s| s.returns), Some(RetKind::Int));
        assert!(lookup("straight_feed").is_none());
    }
}
