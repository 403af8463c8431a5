// Element registry: the fixed catalog of groups and the host elements each
// group drives. Built once, never mutated.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::model::ElementId;

/// Logical group of host elements that are always driven identically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    Hotbar1,
    Hotbar2,
    Hotbar3,
    Hotbar4,
    Hotbar5,
    Hotbar6,
    Hotbar7,
    Hotbar8,
    Hotbar9,
    Hotbar10,
    CrossHotbar,
    PetHotbar,
    ContextActionHotbar,
    Job,
    CastBar,
    ExperienceBar,
    InventoryGrid,
    Currency,
    ScenarioGuide,
    QuestLog,
    DutyList,
    ServerInfo,
    IslekeepIndex,
    MainMenu,
    Chat,
    Minimap,
    Nameplates,
    TargetInfo,
    PartyList,
    LimitBreak,
    Parameters,
    Status,
    StatusEnhancements,
    StatusEnfeeblements,
    StatusOther,
}

impl Group {
    pub fn all() -> &'static [Group] {
        &[
            Self::Hotbar1,
            Self::Hotbar2,
            Self::Hotbar3,
            Self::Hotbar4,
            Self::Hotbar5,
            Self::Hotbar6,
            Self::Hotbar7,
            Self::Hotbar8,
            Self::Hotbar9,
            Self::Hotbar10,
            Self::CrossHotbar,
            Self::PetHotbar,
            Self::ContextActionHotbar,
            Self::Job,
            Self::CastBar,
            Self::ExperienceBar,
            Self::InventoryGrid,
            Self::Currency,
            Self::ScenarioGuide,
            Self::QuestLog,
            Self::DutyList,
            Self::ServerInfo,
            Self::IslekeepIndex,
            Self::MainMenu,
            Self::Chat,
            Self::Minimap,
            Self::Nameplates,
            Self::TargetInfo,
            Self::PartyList,
            Self::LimitBreak,
            Self::Parameters,
            Self::Status,
            Self::StatusEnhancements,
            Self::StatusEnfeeblements,
            Self::StatusOther,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hotbar1 => "Hotbar 1",
            Self::Hotbar2 => "Hotbar 2",
            Self::Hotbar3 => "Hotbar 3",
            Self::Hotbar4 => "Hotbar 4",
            Self::Hotbar5 => "Hotbar 5",
            Self::Hotbar6 => "Hotbar 6",
            Self::Hotbar7 => "Hotbar 7",
            Self::Hotbar8 => "Hotbar 8",
            Self::Hotbar9 => "Hotbar 9",
            Self::Hotbar10 => "Hotbar 10",
            Self::CrossHotbar => "Cross Hotbar",
            Self::PetHotbar => "Pet Hotbar",
            Self::ContextActionHotbar => "Context Action Hotbar",
            Self::Job => "Job Gauge",
            Self::CastBar => "Cast Bar",
            Self::ExperienceBar => "Experience Bar",
            Self::InventoryGrid => "Inventory Grid",
            Self::Currency => "Currency",
            Self::ScenarioGuide => "Scenario Guide",
            Self::QuestLog => "Quest Log",
            Self::DutyList => "Duty List",
            Self::ServerInfo => "Server Information",
            Self::IslekeepIndex => "Islekeep's Index",
            Self::MainMenu => "Main Menu",
            Self::Chat => "Chat",
            Self::Minimap => "Minimap",
            Self::Nameplates => "Nameplates",
            Self::TargetInfo => "Target Info",
            Self::PartyList => "Party List",
            Self::LimitBreak => "Limit Break",
            Self::Parameters => "Parameters",
            Self::Status => "Status",
            Self::StatusEnhancements => "Status Enhancements",
            Self::StatusEnfeeblements => "Status Enfeeblements",
            Self::StatusOther => "Status Other",
        }
    }

    /// Host element names driven by this group
    pub fn element_ids(&self) -> &'static [ElementId] {
        match self {
            Self::Hotbar1 => &["_ActionBar"],
            Self::Hotbar2 => &["_ActionBar01"],
            Self::Hotbar3 => &["_ActionBar02"],
            Self::Hotbar4 => &["_ActionBar03"],
            Self::Hotbar5 => &["_ActionBar04"],
            Self::Hotbar6 => &["_ActionBar05"],
            Self::Hotbar7 => &["_ActionBar06"],
            Self::Hotbar8 => &["_ActionBar07"],
            Self::Hotbar9 => &["_ActionBar08"],
            Self::Hotbar10 => &["_ActionBar09"],
            Self::CrossHotbar => &["_ActionCross", "_ActionDoubleCrossL", "_ActionDoubleCrossR"],
            Self::PetHotbar => &["_ActionBarEx"],
            Self::ContextActionHotbar => &["_ActionContents"],
            Self::Job => &[
                "JobHudPLD0",
                "JobHudWAR0",
                "JobHudDRK0",
                "JobHudDRK1",
                "JobHudGNB0",
                "JobHudWHM0",
                "JobHudACN0",
                "JobHudSCH0",
                "JobHudAST0",
                "JobHudGFF0",
                "JobHudGFF1",
                "JobHudMNK0",
                "JobHudMNK1",
                "JobHudDRG0",
                "JobHudNIN0",
                "JobHudNIN1v70",
                "JobHudSAM0",
                "JobHudSAM1",
                "JobHudRRP0",
                "JobHudRRP1",
                "JobHudBRD0",
                "JobHudMCH0",
                "JobHudDNC0",
                "JobHudDNC1",
                "JobHudBLM0",
                "JobHudBLM1",
                "JobHudSMN0",
                "JobHudSMN1",
                "JobHudRDM0",
                "JobHudRPM0",
                "JobHudRPM1",
                "JobHudRDB0",
                "JobHudRDB1",
            ],
            Self::CastBar => &["_CastBar"],
            Self::ExperienceBar => &["_Exp"],
            Self::InventoryGrid => &["_BagWidget"],
            Self::Currency => &["_Money"],
            Self::ScenarioGuide => &["ScenarioTree"],
            Self::QuestLog => &[],
            Self::DutyList => &["_ToDoList"],
            Self::ServerInfo => &["_DTR"],
            Self::IslekeepIndex => &["MJIHud"],
            Self::MainMenu => &["_MainCommand"],
            Self::Chat => &[
                "ChatLog",
                "ChatLogPanel_0",
                "ChatLogPanel_1",
                "ChatLogPanel_2",
                "ChatLogPanel_3",
            ],
            Self::Minimap => &["_NaviMap"],
            Self::Nameplates => &[],
            Self::TargetInfo => &[
                "_TargetInfoMainTarget",
                "_TargetInfoBuffDebuff",
                "_TargetInfoCastBar",
                "_TargetInfo",
            ],
            Self::PartyList => &["_PartyList"],
            Self::LimitBreak => &["_LimitBreak"],
            Self::Parameters => &["_ParameterWidget"],
            Self::Status => &["_Status"],
            Self::StatusEnhancements => &["_StatusCustom0"],
            Self::StatusEnfeeblements => &["_StatusCustom1"],
            Self::StatusOther => &["_StatusCustom2"],
        }
    }

    /// Groups the engine never drives
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::QuestLog | Self::Nameplates)
    }
}

lazy_static! {
    static ref TRACKED: Vec<(ElementId, Group)> = build_tracked();
}

// First group to claim an element name keeps it.
fn build_tracked() -> Vec<(ElementId, Group)> {
    let mut seen = HashMap::new();
    let mut tracked = Vec::new();
    for group in Group::all() {
        if group.is_ignored() {
            continue;
        }
        for id in group.element_ids() {
            if seen.insert(*id, *group).is_none() {
                tracked.push((*id, *group));
            }
        }
    }
    tracked
}

/// Every tracked element with its group, in catalog order
pub fn tracked_elements() -> &'static [(ElementId, Group)] {
    TRACKED.as_slice()
}

/// Tracked elements of one group
pub fn elements_of(group: Group) -> impl Iterator<Item = ElementId> {
    TRACKED
        .iter()
        .filter(move |(_, g)| *g == group)
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_groups_have_names() {
        for group in Group::all() {
            assert!(!group.display_name().is_empty());
        }
    }

    #[test]
    fn test_ignored_groups_are_not_tracked() {
        assert!(elements_of(Group::QuestLog).next().is_none());
        assert!(elements_of(Group::Nameplates).next().is_none());
    }

    fn group_of(id: &str) -> Option<Group> {
        tracked_elements()
            .iter()
            .find(|(tracked, _)| *tracked == id)
            .map(|(_, group)| *group)
    }

    #[test]
    fn test_element_names_are_tracked_once() {
        let mut seen = std::collections::HashSet::new();
        for (id, _) in tracked_elements() {
            assert!(seen.insert(*id), "{} tracked twice", id);
        }
    }

    #[test]
    fn test_multi_element_groups() {
        assert_eq!(elements_of(Group::CrossHotbar).count(), 3);
        assert_eq!(elements_of(Group::Chat).count(), 5);
        assert_eq!(group_of("ChatLogPanel_2"), Some(Group::Chat));
        assert_eq!(group_of("_ActionBar"), Some(Group::Hotbar1));
        assert_eq!(group_of("NotAnAddon"), None);
    }
}
