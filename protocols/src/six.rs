//! The "six" protocol generation.
//!
//! Dense ids follow declaration order. Extended types are identified on the
//! wire by the UUID of their extension string, so new ones may be appended
//! freely; dense types must never be inserted or reordered.

use schema::{FieldSpec, Registry, TypeDef};

use crate::consts::{
    AUTHED_ADMIN, AUTHED_NO, FLAG_MISSING, MAX_CLIENTS, NUM_EMOTES, NUM_EMOTICONS, NUM_SOUNDS,
    NUM_WEAPONS, SPEC_FREEVIEW, TEAM_BLUE, TEAM_RED, TEAM_SPECTATORS,
};

const fn any() -> FieldSpec {
    FieldSpec::int_any()
}

const fn range(min: i32, max: i32) -> FieldSpec {
    FieldSpec::int_range(min, max)
}

const fn client_id() -> FieldSpec {
    FieldSpec::int_range(0, MAX_CLIENTS - 1)
}

const fn weapon() -> FieldSpec {
    FieldSpec::int_range(0, NUM_WEAPONS - 1)
}

/// The six registry.
#[must_use]
pub fn registry() -> Registry {
    Registry::builder()
        .extend(objects())
        .extend(events())
        .extend(messages())
        .build()
        .expect("six registry must be valid")
}

fn objects() -> Vec<TypeDef> {
    vec![
        TypeDef::object("PlayerInput")
            .field("m_Direction", any())
            .field("m_TargetX", any())
            .field("m_TargetY", any())
            .field("m_Jump", any())
            .field("m_Fire", any())
            .field("m_Hook", any())
            .field("m_PlayerFlags", range(0, 256))
            .field("m_WantedWeapon", any())
            .field("m_NextWeapon", any())
            .field("m_PrevWeapon", any()),
        TypeDef::object("Projectile")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_VelX", any())
            .field("m_VelY", any())
            .field("m_Type", weapon())
            .field("m_StartTick", FieldSpec::tick()),
        TypeDef::object("Laser")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_FromX", any())
            .field("m_FromY", any())
            .field("m_StartTick", FieldSpec::tick()),
        TypeDef::object("Pickup")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_Type", range(0, i32::MAX))
            .field("m_Subtype", range(0, i32::MAX)),
        TypeDef::object("Flag")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_Team", range(TEAM_RED, TEAM_BLUE)),
        TypeDef::object("GameInfo")
            .field("m_GameFlags", range(0, 256))
            .field("m_GameStateFlags", range(0, 256))
            .field("m_RoundStartTick", FieldSpec::tick())
            .field("m_WarmupTimer", range(i32::MIN, i32::MAX))
            .field("m_ScoreLimit", range(0, i32::MAX))
            .field("m_TimeLimit", range(0, i32::MAX))
            .field("m_RoundNum", range(0, i32::MAX))
            .field("m_RoundCurrent", range(0, i32::MAX)),
        TypeDef::object("GameData")
            .field("m_TeamscoreRed", any())
            .field("m_TeamscoreBlue", any())
            .field("m_FlagCarrierRed", range(FLAG_MISSING, MAX_CLIENTS - 1))
            .field("m_FlagCarrierBlue", range(FLAG_MISSING, MAX_CLIENTS - 1)),
        TypeDef::object("CharacterCore")
            .field("m_Tick", any())
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_VelX", any())
            .field("m_VelY", any())
            .field("m_Angle", any())
            .field("m_Direction", range(-1, 1))
            .field("m_Jumped", range(0, 3))
            .field("m_HookedPlayer", range(-1, MAX_CLIENTS - 1))
            .field("m_HookState", range(-1, 5))
            .field("m_HookTick", any())
            .field("m_HookX", any())
            .field("m_HookY", any())
            .field("m_HookDx", any())
            .field("m_HookDy", any()),
        TypeDef::object("Character")
            .extends("CharacterCore")
            .field("m_PlayerFlags", range(0, 256))
            .field("m_Health", range(0, 10))
            .field("m_Armor", range(0, 10))
            .field("m_AmmoCount", range(0, 10))
            .field("m_Weapon", range(-1, NUM_WEAPONS - 1))
            .field("m_Emote", range(0, NUM_EMOTES))
            .field("m_AttackTick", range(0, i32::MAX)),
        TypeDef::object("PlayerInfo")
            .field("m_Local", range(0, 1))
            .field("m_ClientId", client_id())
            .field("m_Team", range(TEAM_SPECTATORS, TEAM_BLUE))
            .field("m_Score", any())
            .field("m_Latency", any()),
        // Names are packed four characters per int.
        TypeDef::object("ClientInfo")
            .field("m_Name0", any())
            .field("m_Name1", any())
            .field("m_Name2", any())
            .field("m_Name3", any())
            .field("m_Clan0", any())
            .field("m_Clan1", any())
            .field("m_Clan2", any())
            .field("m_Country", any())
            .field("m_Skin0", any())
            .field("m_Skin1", any())
            .field("m_Skin2", any())
            .field("m_Skin3", any())
            .field("m_Skin4", any())
            .field("m_Skin5", any())
            .field("m_UseCustomColor", range(0, 1))
            .field("m_ColorBody", any())
            .field("m_ColorFeet", any()),
        TypeDef::object("SpectatorInfo")
            .field("m_SpectatorId", range(SPEC_FREEVIEW, MAX_CLIENTS - 1))
            .field("m_X", any())
            .field("m_Y", any()),
        TypeDef::object("MyOwnObject")
            .extension("my-own-object@heinrich5991.de")
            .field("m_Test", any()),
        TypeDef::object("DDNetCharacter")
            .extension("character@netobj.ddnet.tw")
            .unvalidated_size()
            .field("m_Flags", any().with_default(0))
            .field("m_FreezeEnd", FieldSpec::tick().with_default(0))
            .field("m_Jumps", range(-1, 255).with_default(2))
            .field("m_TeleCheckpoint", any().with_default(-1))
            .field("m_StrongWeakId", client_id().with_default(0))
            // -1 marks the value as not sent by the server.
            .field("m_JumpedTotal", range(-1, 255).with_default(-1))
            .field("m_NinjaActivationTick", FieldSpec::tick().with_default(-1))
            .field("m_FreezeStart", FieldSpec::tick().with_default(-1))
            .field("m_TargetX", any().with_default(0))
            .field("m_TargetY", any().with_default(0)),
        TypeDef::object("DDNetPlayer")
            .extension("player@netobj.ddnet.tw")
            .field("m_Flags", any())
            .field("m_AuthLevel", range(AUTHED_NO, AUTHED_ADMIN)),
        TypeDef::object("GameInfoEx")
            .extension("gameinfo@netobj.ddnet.tw")
            .unvalidated_size()
            .field("m_Flags", any().with_default(0))
            .field("m_Version", any().with_default(0))
            .field("m_Flags2", any().with_default(0)),
        TypeDef::object("DDRaceProjectile")
            .extension("projectile@netobj.ddnet.tw")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_Angle", any())
            .field("m_Data", any())
            .field("m_Type", weapon())
            .field("m_StartTick", FieldSpec::tick()),
        TypeDef::object("DDNetLaser")
            .extension("laser@netobj.ddnet.tw")
            .field("m_ToX", any())
            .field("m_ToY", any())
            .field("m_FromX", any())
            .field("m_FromY", any())
            .field("m_StartTick", FieldSpec::tick())
            .field("m_Owner", range(-1, MAX_CLIENTS - 1))
            .field("m_Type", any())
            .field("m_SwitchNumber", any().with_default(-1))
            .field("m_Subtype", any().with_default(-1))
            .field("m_Flags", any().with_default(0)),
        TypeDef::object("DDNetProjectile")
            .extension("ddnet-projectile@netobj.ddnet.tw")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_VelX", any())
            .field("m_VelY", any())
            .field("m_Type", weapon())
            .field("m_StartTick", FieldSpec::tick())
            .field("m_Owner", range(-1, MAX_CLIENTS - 1))
            .field("m_SwitchNumber", any())
            .field("m_TuneZone", any())
            .field("m_Flags", any()),
        TypeDef::object("DDNetPickup")
            .extension("pickup@netobj.ddnet.tw")
            .field("m_X", any())
            .field("m_Y", any())
            .field("m_Type", range(0, i32::MAX))
            .field("m_Subtype", range(0, i32::MAX))
            .field("m_SwitchNumber", any()),
        TypeDef::object("MyOwnEvent")
            .extension("my-own-event@heinrich5991.de")
            .field("m_Test", any()),
        TypeDef::object("SpecChar")
            .extension("spec-char@netobj.ddnet.tw")
            .field("m_X", any())
            .field("m_Y", any()),
        // 256 switches in 32-bit words, plus up to four timed switchers.
        TypeDef::object("SwitchState")
            .extension("switch-state@netobj.ddnet.tw")
            .unvalidated_size()
            .field("m_HighestSwitchNumber", any().with_default(0))
            .field("m_aStatus", FieldSpec::array(any().with_default(0), 8))
            .field("m_aSwitchNumbers", FieldSpec::array(any().with_default(0), 4))
            .field("m_aEndTicks", FieldSpec::array(any().with_default(0), 4)),
        TypeDef::object("EntityEx")
            .extension("entity-ex@netobj.ddnet.tw")
            .field("m_SwitchNumber", any())
            .field("m_Layer", any())
            .field("m_EntityClass", any()),
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
        TypeDef::event("SoundGlobal")
            .extends("Common")
            .field("m_SoundId", range(0, NUM_SOUNDS - 1)),
        TypeDef::event("SoundWorld")
            .extends("Common")
            .field("m_SoundId", range(0, NUM_SOUNDS - 1)),
        TypeDef::event("DamageInd")
            .extends("Common")
            .field("m_Angle", any()),
        TypeDef::event("Birthday")
            .extends("Common")
            .extension("birthday@netevent.ddnet.org"),
        TypeDef::event("Finish")
            .extends("Common")
            .extension("finish@netevent.ddnet.org"),
        TypeDef::event("MapSoundWorld")
            .extends("Common")
            .extension("map-sound-world@netevent.ddnet.org")
            .field("m_SoundId", any()),
    ]
}

fn vote_option_list_add() -> TypeDef {
    (0..15).fold(
        TypeDef::message("Sv_VoteOptionListAdd").field("m_NumOptions", range(1, 15)),
        |def, index| def.field(format!("m_pDescription{index}"), FieldSpec::string_strict()),
    )
}

fn client_info(name: &str) -> TypeDef {
    TypeDef::message(name)
        .field("m_pName", FieldSpec::string_strict())
        .field("m_pClan", FieldSpec::string_strict())
        .field("m_Country", any())
        .field("m_pSkin", FieldSpec::string_strict())
        .field("m_UseCustomColor", FieldSpec::bool())
        .field("m_ColorBody", any())
        .field("m_ColorFeet", any())
}

fn messages() -> Vec<TypeDef> {
    vec![
        TypeDef::message("Sv_Motd").field("m_pMessage", FieldSpec::string()),
        TypeDef::message("Sv_Broadcast").field("m_pMessage", FieldSpec::string()),
        TypeDef::message("Sv_Chat")
            .field("m_Team", range(-2, 3))
            .field("m_ClientId", range(-1, MAX_CLIENTS - 1))
            .field("m_pMessage", FieldSpec::string_half_strict()),
        TypeDef::message("Sv_KillMsg")
            .field("m_Killer", client_id())
            .field("m_Victim", client_id())
            .field("m_Weapon", range(-3, NUM_WEAPONS - 1))
            .field("m_ModeSpecial", any()),
        TypeDef::message("Sv_SoundGlobal").field("m_SoundId", range(0, NUM_SOUNDS - 1)),
        TypeDef::message("Sv_TuneParams"),
        TypeDef::message("Unused"),
        TypeDef::message("Sv_ReadyToEnter"),
        TypeDef::message("Sv_WeaponPickup").field("m_Weapon", weapon()),
        TypeDef::message("Sv_Emoticon")
            .field("m_ClientId", client_id())
            .field("m_Emoticon", range(0, NUM_EMOTICONS - 1)),
        TypeDef::message("Sv_VoteClearOptions"),
        vote_option_list_add(),
        TypeDef::message("Sv_VoteOptionAdd").field("m_pDescription", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteOptionRemove")
            .field("m_pDescription", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteSet")
            .field("m_Timeout", range(0, i32::MAX))
            .field("m_pDescription", FieldSpec::string_strict())
            .field("m_pReason", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteStatus")
            .field("m_Yes", range(0, MAX_CLIENTS))
            .field("m_No", range(0, MAX_CLIENTS))
            .field("m_Pass", range(0, MAX_CLIENTS))
            .field("m_Total", range(0, MAX_CLIENTS)),
        TypeDef::message("Cl_Say")
            .not_recordable()
            .field("m_Team", FieldSpec::bool())
            .field("m_pMessage", FieldSpec::string_half_strict()),
        TypeDef::message("Cl_SetTeam").field("m_Team", range(TEAM_SPECTATORS, TEAM_BLUE)),
        TypeDef::message("Cl_SetSpectatorMode")
            .field("m_SpectatorId", range(SPEC_FREEVIEW, MAX_CLIENTS - 1)),
        client_info("Cl_StartInfo"),
        client_info("Cl_ChangeInfo"),
        TypeDef::message("Cl_Kill"),
        TypeDef::message("Cl_Emoticon").field("m_Emoticon", range(0, NUM_EMOTICONS - 1)),
        TypeDef::message("Cl_Vote")
            .not_recordable()
            .field("m_Vote", range(-1, 1)),
        TypeDef::message("Cl_CallVote")
            .not_recordable()
            .field("m_pType", FieldSpec::string_strict())
            .field("m_pValue", FieldSpec::string_strict())
            .field("m_pReason", FieldSpec::string_strict()),
        TypeDef::message("Cl_IsDDNetLegacy"),
        TypeDef::message("Sv_DDRaceTimeLegacy")
            .field("m_Time", any())
            .field("m_Check", any())
            .field("m_Finish", range(0, 1)),
        TypeDef::message("Sv_RecordLegacy")
            .field("m_ServerTimeBest", any())
            .field("m_PlayerTimeBest", any()),
        TypeDef::message("Unused2"),
        TypeDef::message("Sv_TeamsStateLegacy"),
        TypeDef::message("Cl_ShowOthersLegacy").field("m_Show", FieldSpec::bool()),
        // Only extended messages below this point.
        TypeDef::message("Sv_MyOwnMessage")
            .extension("my-own-message@heinrich5991.de")
            .field("m_Test", any()),
        TypeDef::message("Cl_ShowDistance")
            .extension("show-distance@netmsg.ddnet.tw")
            .field("m_X", any())
            .field("m_Y", any()),
        TypeDef::message("Cl_ShowOthers")
            .extension("showothers@netmsg.ddnet.tw")
            .field("m_Show", range(0, 2)),
        TypeDef::message("Sv_TeamsState").extension("teamsstate@netmsg.ddnet.tw"),
        TypeDef::message("Sv_DDRaceTime")
            .extension("ddrace-time@netmsg.ddnet.tw")
            .field("m_Time", any())
            .field("m_Check", any())
            .field("m_Finish", range(0, 1)),
        TypeDef::message("Sv_Record")
            .extension("record@netmsg.ddnet.tw")
            .field("m_ServerTimeBest", any())
            .field("m_PlayerTimeBest", any()),
        TypeDef::message("Sv_KillMsgTeam")
            .extension("killmsgteam@netmsg.ddnet.tw")
            .field("m_Team", client_id())
            .field("m_First", range(-1, MAX_CLIENTS - 1)),
        TypeDef::message("Sv_YourVote")
            .extension("yourvote@netmsg.ddnet.org")
            .field("m_Voted", range(-1, 1)),
        TypeDef::message("Sv_RaceFinish")
            .extension("racefinish@netmsg.ddnet.org")
            .field("m_ClientId", client_id())
            .field("m_Time", any())
            .field("m_Diff", any())
            .field("m_RecordPersonal", FieldSpec::bool())
            .field("m_RecordServer", FieldSpec::bool().with_default(0)),
        TypeDef::message("Sv_CommandInfo")
            .extension("commandinfo@netmsg.ddnet.org")
            .field("m_pName", FieldSpec::string_strict())
            .field("m_pArgsFormat", FieldSpec::string_strict())
            .field("m_pHelpText", FieldSpec::string_strict()),
        TypeDef::message("Sv_CommandInfoRemove")
            .extension("commandinfo-remove@netmsg.ddnet.org")
            .field("m_pName", FieldSpec::string_strict()),
        TypeDef::message("Sv_VoteOptionGroupStart")
            .extension("sv-vote-option-group-start@netmsg.ddnet.org"),
        TypeDef::message("Sv_VoteOptionGroupEnd")
            .extension("sv-vote-option-group-end@netmsg.ddnet.org"),
        TypeDef::message("Sv_CommandInfoGroupStart")
            .extension("sv-commandinfo-group-start@netmsg.ddnet.org"),
        TypeDef::message("Sv_CommandInfoGroupEnd")
            .extension("sv-commandinfo-group-end@netmsg.ddnet.org"),
        TypeDef::message("Sv_ChangeInfoCooldown")
            .extension("change-info-cooldown@netmsg.ddnet.org")
            .field("m_WaitUntil", FieldSpec::tick()),
        TypeDef::message("Sv_MapSoundGlobal")
            .extension("map-sound-global@netmsg.ddnet.org")
            .field("m_SoundId", any()),
    ]
}
