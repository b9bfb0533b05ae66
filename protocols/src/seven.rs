//! The "seven" protocol generation.
//!
//! Seven shares most canonical type names with six but numbers them
//! differently: new messages were inserted between the old ones. Enumerated
//! and bit-flag fields use [`FieldSpec::enumeration`] and [`FieldSpec::flags`].

use schema::{FieldSpec, Registry, TypeDef};

use crate::consts::{
    flag_mask, FLAG_MISSING, MAX_CLIENTS, NUM_EMOTES, NUM_EMOTICONS, NUM_SOUNDS, NUM_WEAPONS,
    TEAM_BLUE, TEAM_RED, TEAM_SPECTATORS,
};

pub const NUM_PICKUPS: i32 = 8;
pub const NUM_VOTE_TYPES: i32 = 7;
pub const NUM_CHAT_MODES: i32 = 4;
pub const NUM_SPEC_MODES: i32 = 4;
pub const NUM_SKIN_PARTS: usize = 6;

pub const PLAYERFLAG_MASK: i32 = flag_mask(8);
pub const GAMEFLAG_MASK: i32 = flag_mask(4);
pub const GAMESTATEFLAG_MASK: i32 = flag_mask(6);
pub const COREEVENTFLAG_MASK: i32 = flag_mask(5);

const fn any() -> FieldSpec {
    FieldSpec::int_any()
}

const fn range(min: i32, max: i32) -> FieldSpec {
    FieldSpec::int_range(min, max)
}

const fn tick() -> FieldSpec {
    FieldSpec::int_range(0, i32::MAX)
}

const fn client_id() -> FieldSpec {
    FieldSpec::int_range(0, MAX_CLIENTS - 1)
}

const fn optional_client_id() -> FieldSpec {
    FieldSpec::int_range(-1, MAX_CLIENTS - 1)
}

const fn team() -> FieldSpec {
    FieldSpec::int_range(TEAM_SPECTATORS, TEAM_BLUE)
}

/// The seven registry.
#[must_use]
pub fn registry() -> Registry {
    Registry::builder()
        .extend(objects())
        .extend(events())
        .extend(messages())
        .build()
        .expect("seven registry must be valid")
}

fn objects() -> Vec<TypeDef> {
    vec![
        TypeDef::object("PlayerInput")
            .field("m_Direction", range(-1, 1))
            .field("m_TargetX", any())
            .field("m_TargetY", any())
            .field("m_Jump", FieldSpec::bool())
            .field("m_Fire", any())
            .field("m_Hook", FieldSpec::bool())
            .field("m_PlayerFlags", FieldSpec::flags(PLAYERFLAG_MASK))
            .field("m_WantedWeapon", range(0, NUM_WEAPONS))
            .field("m_NextWeapon", any())
            .field("m_PrevWeapon", any()),
        TypeDef::object("Projectile")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_VelX", any())
            .field("m_VelY", any())
            .field("m_Type", range(0, NUM_WEAPONS - 1))
            .field("m_StartTick", tick()),
        TypeDef::object("Laser")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_FromX", any())
            .field("m_FromY", any())
            .field("m_StartTick", tick()),
        TypeDef::object("Pickup")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_Type", FieldSpec::enumeration(NUM_PICKUPS)),
        TypeDef::object("Flag")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_Team", range(TEAM_RED, TEAM_BLUE)),
        TypeDef::object("GameData")
            .field("m_GameStartTick", tick())
            .field("m_GameStateFlags", FieldSpec::flags(GAMESTATEFLAG_MASK))
            .field("m_GameStateEndTick", tick()),
        TypeDef::object("GameDataTeam")
            .field("m_TeamscoreRed", any())
            .field("m_TeamscoreBlue", any()),
        TypeDef::object("GameDataFlag")
            .field("m_FlagCarrierRed", range(FLAG_MISSING, MAX_CLIENTS - 1))
            .field("m_FlagCarrierBlue", range(FLAG_MISSING, MAX_CLIENTS - 1))
            .field("m_FlagDropTickRed", tick())
            .field("m_FlagDropTickBlue", tick()),
        TypeDef::object("CharacterCore")
            .field("m_Tick", tick())
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_VelX", any())
            .field("m_VelY", any())
            .field("m_Angle", any())
            .field("m_Direction", range(-1, 1))
            .field("m_Jumped", range(0, 3))
            .field("m_HookedPlayer", optional_client_id())
            .field("m_HookState", range(-1, 5))
            .field("m_HookTick", tick())
            .field("m_HookX", any())
            .field("m_HookY", any())
            .field("m_HookDx", any())
            .field("m_HookDy", any()),
        TypeDef::object("Character")
            .extends("CharacterCore")
            .field("m_Health", range(0, 10))
            .field("m_Armor", range(0, 10))
            .field("m_AmmoCount", range(-1, 10))
            .field("m_Weapon", range(-1, NUM_WEAPONS - 1))
            .field("m_Emote", FieldSpec::enumeration(NUM_EMOTES))
            .field("m_AttackTick", tick())
            .field("m_TriggeredEvents", FieldSpec::flags(COREEVENTFLAG_MASK)),
        TypeDef::object("PlayerInfo")
            .field("m_PlayerFlags", FieldSpec::flags(PLAYERFLAG_MASK))
            .field("m_Score", any())
            .field("m_Latency", any()),
        TypeDef::object("SpectatorInfo")
            .field("m_SpecMode", FieldSpec::enumeration(NUM_SPEC_MODES))
            .field("m_SpectatorId", optional_client_id())
            .field("m_X", any())
            .field("m_Y", any()),
        // Demo-only items. Names are packed four characters per int; the skin
        // part names are six parts of six ints each.
        TypeDef::object("De_ClientInfo")
            .field("m_Local", FieldSpec::bool())
            .field("m_Team", team())
            .field("m_aName", FieldSpec::array(any(), 4))
            .field("m_aClan", FieldSpec::array(any(), 3))
            .field("m_Country", any())
            .field("m_aaSkinPartNames", FieldSpec::array(any(), NUM_SKIN_PARTS * 6))
            .field("m_aUseCustomColors", FieldSpec::array(FieldSpec::bool(), NUM_SKIN_PARTS))
            .field("m_aSkinPartColors", FieldSpec::array(any(), NUM_SKIN_PARTS)),
        TypeDef::object("De_GameInfo")
            .field("m_GameFlags", FieldSpec::flags(GAMEFLAG_MASK))
            .field("m_ScoreLimit", range(0, i32::MAX))
            .field("m_TimeLimit", range(0, i32::MAX))
            .field("m_MatchNum", range(0, i32::MAX))
            .field("m_MatchCurrent", range(0, i32::MAX)),
        TypeDef::object("De_TuneParams").field("m_aTuneParams", FieldSpec::array(any(), 32)),
    ]
}

fn events() -> Vec<TypeDef> {
    vec![
        TypeDef::event("Common").field("m_X", any()).field("m_Y", any()),
        TypeDef::event("Explosion").extends("Common"),
        TypeDef::event("Spawn").extends("Common"),
        TypeDef::event("HammerHit").extends("Common"),
        TypeDef::event("Death")
            .extends("Common")
            .field("m_ClientId", client_id()),
        TypeDef::event("SoundWorld")
            .extends("Common")
            .field("m_SoundId", range(0, NUM_SOUNDS - 1)),
        TypeDef::event("Damage")
            .extends("Common")
            .field("m_ClientId", client_id())
            .field("m_Angle", any())
            .field("m_HealthAmount", range(0, 9))
            .field("m_ArmorAmount", range(0, 9))
            .field("m_Self", FieldSpec::bool()),
    ]
}

fn skin(def: TypeDef) -> TypeDef {
    def.field(
        "m_apSkinPartNames",
        FieldSpec::array(FieldSpec::string_strict(), NUM_SKIN_PARTS),
    )
    .field(
        "m_aUseCustomColors",
        FieldSpec::array(FieldSpec::bool(), NUM_SKIN_PARTS),
    )
    .field("m_aSkinPartColors", FieldSpec::array(any(), NUM_SKIN_PARTS))
}

fn vote_option_list_add() -> TypeDef {
    (0..15).fold(
        TypeDef::message("Sv_VoteOptionListAdd").field("m_NumOptions", range(1, 15)),
        |def, index| def.field(format!("m_pDescription{index}"), FieldSpec::string_strict()),
    )
}

fn messages() -> Vec<TypeDef> {
    vec![
        TypeDef::message("Sv_Motd").field("m_pMessage", FieldSpec::string()),
        TypeDef::message("Sv_Broadcast").field("m_pMessage", FieldSpec::string()),
        TypeDef::message("Sv_Chat")
            .field("m_Mode", FieldSpec::enumeration(NUM_CHAT_MODES))
            .field("m_ClientId", optional_client_id())
            .field("m_TargetId", optional_client_id())
            .field("m_pMessage", FieldSpec::string()),
        TypeDef::message("Sv_Team")
            .field("m_ClientId", optional_client_id())
            .field("m_Team", team())
            .field("m_Silent", FieldSpec::bool())
            .field("m_CooldownTick", tick()),
        TypeDef::message("Sv_KillMsg")
            .field("m_Killer", optional_client_id())
            .field("m_Victim", client_id())
            .field("m_Weapon", range(-3, NUM_WEAPONS - 1))
            .field("m_ModeSpecial", any()),
        TypeDef::message("Sv_TuneParams"),
        TypeDef::message("Sv_ExtraProjectile"),
        TypeDef::message("Sv_ReadyToEnter"),
        TypeDef::message("Sv_WeaponPickup").field("m_Weapon", range(0, NUM_WEAPONS - 1)),
        TypeDef::message("Sv_Emoticon")
            .field("m_ClientId", client_id())
            .field("m_Emoticon", FieldSpec::enumeration(NUM_EMOTICONS)),
        TypeDef::message("Sv_VoteClearOptions"),
        vote_option_list_add(),
        TypeDef::message("Sv_VoteOptionAdd").field("m_pDescription", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteOptionRemove")
            .field("m_pDescription", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteSet")
            .field("m_ClientId", optional_client_id())
            .field("m_Type", FieldSpec::enumeration(NUM_VOTE_TYPES))
            .field("m_Timeout", range(0, 60))
            .field("m_pDescription", FieldSpec::string_strict())
            .field("m_pReason", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteStatus")
            .field("m_Yes", range(0, MAX_CLIENTS))
            .field("m_No", range(0, MAX_CLIENTS))
            .field("m_Pass", range(0, MAX_CLIENTS))
            .field("m_Total", range(0, MAX_CLIENTS)),
        TypeDef::message("Sv_ServerSettings")
            .field("m_KickVote", FieldSpec::bool())
            .field("m_KickMin", range(0, MAX_CLIENTS))
            .field("m_SpecVote", FieldSpec::bool())
            .field("m_TeamLock", FieldSpec::bool())
            .field("m_TeamBalance", FieldSpec::bool())
            .field("m_PlayerSlots", range(0, MAX_CLIENTS)),
        skin(
            TypeDef::message("Sv_ClientInfo")
                .field("m_ClientId", client_id())
                .field("m_Local", FieldSpec::bool())
                .field("m_Team", team())
                .field("m_pName", FieldSpec::string_strict())
                .field("m_pClan", FieldSpec::string_strict())
                .field("m_Country", any()),
        )
        .field("m_Silent", FieldSpec::bool()),
        TypeDef::message("Sv_GameInfo")
            .field("m_GameFlags", FieldSpec::flags(GAMEFLAG_MASK))
            .field("m_ScoreLimit", range(0, i32::MAX))
            .field("m_TimeLimit", range(0, i32::MAX))
            .field("m_MatchNum", range(0, i32::MAX))
            .field("m_MatchCurrent", range(0, i32::MAX)),
        TypeDef::message("Sv_ClientDrop")
            .field("m_ClientId", client_id())
            .field("m_pReason", FieldSpec::string_strict())
            .field("m_Silent", FieldSpec::bool()),
        TypeDef::message("Sv_GameMsg"),
        TypeDef::message("De_ClientEnter")
            .field("m_pName", FieldSpec::string_strict())
            .field("m_ClientId", optional_client_id())
            .field("m_Team", team()),
        TypeDef::message("De_ClientLeave")
            .field("m_pName", FieldSpec::string_strict())
            .field("m_ClientId", optional_client_id())
            .field("m_pReason", FieldSpec::string_strict()),
        TypeDef::message("Cl_Say")
            .field("m_Mode", FieldSpec::enumeration(NUM_CHAT_MODES))
            .field("m_Target", optional_client_id())
            .field("m_pMessage", FieldSpec::string_strict()),
        TypeDef::message("Cl_SetTeam").field("m_Team", team()),
        TypeDef::message("Cl_SetSpectatorMode")
            .field("m_SpecMode", FieldSpec::enumeration(NUM_SPEC_MODES))
            .field("m_SpectatorId", optional_client_id()),
        skin(
            TypeDef::message("Cl_StartInfo")
                .field("m_pName", FieldSpec::string_strict())
                .field("m_pClan", FieldSpec::string_strict())
                .field("m_Country", any()),
        ),
        TypeDef::message("Cl_Kill"),
        TypeDef::message("Cl_ReadyChange"),
        TypeDef::message("Cl_Emoticon").field("m_Emoticon", FieldSpec::enumeration(NUM_EMOTICONS)),
        TypeDef::message("Cl_Vote").field("m_Vote", range(-1, 1)),
        TypeDef::message("Cl_CallVote")
            .field("m_pType", FieldSpec::string_strict())
            .field("m_pValue", FieldSpec::string_strict())
            .field("m_pReason", FieldSpec::string_strict())
            .field("m_Force", FieldSpec::bool()),
        skin(TypeDef::message("Sv_SkinChange").field("m_ClientId", client_id())),
        skin(TypeDef::message("Cl_SkinChange")),
        TypeDef::message("Sv_RaceFinish")
            .field("m_ClientId", client_id())
            .field("m_Time", any())
            .field("m_Diff", any())
            .field("m_RecordPersonal", FieldSpec::bool())
            .field("m_RecordServer", FieldSpec::bool()),
        TypeDef::message("Sv_Checkpoint").field("m_Diff", any()),
        TypeDef::message("Sv_CommandInfo")
            .field("m_pName", FieldSpec::string_strict())
            .field("m_pArgsFormat", FieldSpec::string_strict())
            .field("m_pHelpText", FieldSpec::string_strict()),
        TypeDef::message("Sv_CommandInfoRemove").field("m_pName", FieldSpec::string_strict()),
        TypeDef::message("Cl_Command")
            .field("m_pName", FieldSpec::string_strict())
            .field("m_pArguments", FieldSpec::string_strict()),
    ]
}
