//! Game constants referenced by field ranges.

pub const MAX_CLIENTS: i32 = 64;
pub const NUM_WEAPONS: i32 = 6;
pub const NUM_SOUNDS: i32 = 41;
pub const NUM_EMOTES: i32 = 6;
pub const NUM_EMOTICONS: i32 = 16;

pub const TEAM_SPECTATORS: i32 = -1;
pub const TEAM_RED: i32 = 0;
pub const TEAM_BLUE: i32 = 1;

pub const FLAG_MISSING: i32 = -3;
pub const FLAG_ATSTAND: i32 = -2;
pub const FLAG_TAKEN: i32 = -1;

pub const SPEC_FREEVIEW: i32 = -1;
pub const SPEC_FOLLOW: i32 = -2;

pub const AUTHED_NO: i32 = 0;
pub const AUTHED_ADMIN: i32 = 3;

/// Mask with the low `count` bits set.
#[must_use]
pub const fn flag_mask(count: u32) -> i32 {
    if count >= 31 {
        i32::MAX
    } else {
        (1 << count) - 1
    }
}
