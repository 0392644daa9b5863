//! "C" back-end: emits a header section, per-state handlers with guard
//! ladders, the init/run shims and an event-to-string helper, all bound to
//! the C runtime's `hsm.h` API.
use std::io::{self, Write};

use crate::{
    emit::Emitter,
    model::{Arm, Hsm, Stereotype},
};

const TAB_SIZE: usize = 4;
const USER_TEXT: &str = "==> YOUR.CHANGES.GO.HERE <==";
const EVT2STR_FUNC_NAME: &str = "HSM_Evt2Str";

/// PlantUML keywords that map onto the runtime's reserved event sentinels.
/// They never appear in the generated event enumeration.
fn reserved_event(event: &str) -> Option<&'static str> {
    match event {
        "null" => Some("HSME_NULL"),
        "init" => Some("HSME_INIT"),
        "entry" => Some("HSME_ENTRY"),
        "exit" => Some("HSME_EXIT"),
        _ => None,
    }
}

fn indent(count: usize) -> String {
    " ".repeat(TAB_SIZE * count)
}

pub struct CEmitter;

impl CEmitter {
    fn state_obj(hsm: &Hsm, state: &str) -> String {
        format!("{}_State{}", hsm.name, state)
    }

    fn emit_handler_arm(
        hsm: &Hsm,
        arm: &Arm,
        idx: usize,
        guard_cnt: usize,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if let Some(guard) = &arm.guard {
            if idx == 0 {
                writeln!(out, "{}if ({})", indent(2), guard)?;
            } else {
                writeln!(out, "{}else if ({})", indent(2), guard)?;
            }
        } else if guard_cnt > 1 {
            writeln!(out, "{}else", indent(2))?;
        }

        let braced = arm.guard.is_some() || guard_cnt > 1;
        let body_indent = if braced {
            writeln!(out, "{}{{", indent(2))?;
            3
        } else {
            2
        };

        if let Some(action) = &arm.action {
            // A literal '\n' in the diagram separates independent actions.
            for act in action
                .split("\\n")
                .map(|act| act.trim_start_matches(' '))
                .filter(|act| !act.is_empty())
            {
                writeln!(out, "{}{}", indent(body_indent), act)?;
            }
        }
        if let Some(target) = &arm.target {
            writeln!(
                out,
                "{}HSM_Tran(This, &{}, 0, NULL);",
                indent(body_indent),
                Self::state_obj(hsm, target)
            )?;
        }

        if braced {
            writeln!(out, "{}}}", indent(2))?;
        }
        Ok(())
    }
}

impl Emitter for CEmitter {
    fn emit(&self, hsm: &Hsm, out: &mut dyn Write) -> io::Result<()> {
        let user_events: Vec<&String> = hsm
            .events
            .iter()
            .filter(|event| reserved_event(event).is_none())
            .collect();

        //---Generate Header File---
        writeln!(out, "//----The following belongs to {}.h----", hsm.name)?;
        writeln!(out, "#include \"hsm.h\"\n")?;

        // Event defines. The first event starts at 1, since 0 is HSME_NULL.
        writeln!(out, "// {} HSM Events", hsm.name)?;
        let width = user_events.iter().map(|event| event.len()).max().unwrap_or(0) + TAB_SIZE;
        for (val, event) in user_events.iter().enumerate() {
            writeln!(out, "#define {:<width$} ({})", event, val + 1, width = width)?;
        }
        writeln!(out)?;

        writeln!(out, "// Definition of {} class", hsm.name)?;
        writeln!(out, "typedef struct")?;
        writeln!(out, "{{")?;
        writeln!(out, "{}// Parent  NOTE: HSM parent must be defined first", indent(1))?;
        writeln!(out, "{}HSM parent;", indent(1))?;
        writeln!(out)?;
        writeln!(out, "{}// Child members", indent(1))?;
        writeln!(out, "{}// {}", indent(1), USER_TEXT)?;
        writeln!(out, "}} {}_t;", hsm.name)?;
        writeln!(out)?;

        //---Generate Source File---
        writeln!(out, "//----The following belongs to {}.c----", hsm.name)?;
        for line in hsm.notes_for(&hsm.name, Stereotype::Include) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
        for line in hsm.notes_for(&hsm.name, Stereotype::Code) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;

        writeln!(out, "// {} States", hsm.name)?;
        for state in hsm.states.keys() {
            writeln!(out, "HSM_STATE {};", Self::state_obj(hsm, state))?;
        }
        writeln!(out)?;

        writeln!(out, "// {} State Handlers", hsm.name)?;
        for (name, state) in &hsm.states {
            writeln!(
                out,
                "HSM_EVENT {}_Hndlr(HSM *This, HSM_EVENT event, void *param)",
                Self::state_obj(hsm, name)
            )?;
            writeln!(out, "{{")?;
            writeln!(
                out,
                "{}{}_t *p{} = ({}_t *)This;",
                indent(1),
                hsm.name,
                hsm.name,
                hsm.name
            )?;
            for line in hsm.notes_for(name, Stereotype::Comment) {
                writeln!(out, "{}// {}", indent(1), line)?;
            }
            for line in hsm.notes_for(name, Stereotype::Code) {
                writeln!(out, "{}{}", indent(1), line)?;
            }
            writeln!(out, "{}switch (event)", indent(1))?;
            writeln!(out, "{}{{", indent(1))?;
            for (event, arms) in &state.events {
                let case_name = reserved_event(event).unwrap_or(event);
                writeln!(out, "{}case {}:", indent(1), case_name)?;
                // The default (guardless) arm closes the ladder.
                let guard_cnt = arms.len();
                let ordered = arms
                    .iter()
                    .filter(|arm| arm.guard.is_some())
                    .chain(arms.iter().filter(|arm| arm.guard.is_none()));
                for (idx, arm) in ordered.enumerate() {
                    Self::emit_handler_arm(hsm, arm, idx, guard_cnt, out)?;
                }
                writeln!(out, "{}return 0;\n", indent(2))?;
            }
            writeln!(out, "{}}}", indent(1))?;
            writeln!(out, "{}return event;", indent(1))?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        // The init function wires parents and the starting state.
        writeln!(out, "void {}_Init({}_t *This, char *name)", hsm.name, hsm.name)?;
        writeln!(out, "{{")?;
        writeln!(out, "{}// Step 1: Create the HSM States", indent(1))?;
        for (name, state) in &hsm.states {
            let parent = match &state.parent {
                Some(parent) => format!("&{}", Self::state_obj(hsm, parent)),
                None => "NULL".to_string(),
            };
            writeln!(
                out,
                "{}HSM_STATE_Create(&{}, \"{}\", {}_Hndlr, {});",
                indent(1),
                Self::state_obj(hsm, name),
                name,
                Self::state_obj(hsm, name),
                parent
            )?;
        }
        writeln!(out)?;
        writeln!(out, "{}// Step 2: Initialize the HSM and starting state", indent(1))?;
        let initial = hsm
            .init
            .as_deref()
            .or_else(|| hsm.states.keys().next().map(String::as_str))
            .unwrap_or_default();
        writeln!(
            out,
            "{}HSM_Create((HSM *)This, name, &{});",
            indent(1),
            Self::state_obj(hsm, initial)
        )?;
        writeln!(out)?;
        writeln!(out, "{}// Step 3: [Optional] Enable HSM debug", indent(1))?;
        writeln!(out, "{}HSM_SET_PREFIX((HSM *)This, \"[{}] \");", indent(1), hsm.name)?;
        writeln!(out, "{}HSM_SET_DEBUG((HSM *)This, HSM_SHOW_ALL);", indent(1))?;
        writeln!(out)?;
        writeln!(out, "{}// Step 4: {} object initialization", indent(1), hsm.name)?;
        writeln!(out, "{}// {}", indent(1), USER_TEXT)?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        // Run shim forwarding to the engine.
        writeln!(
            out,
            "void {}_Run({}_t *This, HSM_EVENT event, void *param)",
            hsm.name, hsm.name
        )?;
        writeln!(out, "{{")?;
        writeln!(
            out,
            "{}// Uncomment below to suppress debug for a specific event (e.g. periodic timer event)",
            indent(1)
        )?;
        writeln!(out, "{}// if (event == <NAME.OF.EVENT.YOU.WANT.TO.SUPPRESS>)", indent(1))?;
        writeln!(
            out,
            "{}//{}HSM_SUPPRESS_DEBUG((HSM *)This, HSM_SHOW_ALL);",
            indent(1),
            indent(1)
        )?;
        writeln!(out)?;
        writeln!(out, "{}// Invoke HSM", indent(1))?;
        writeln!(out, "{}HSM_Run((HSM *)This, event, param);", indent(1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "const char *{}(uint32_t event)", EVT2STR_FUNC_NAME)?;
        writeln!(out, "{{")?;
        writeln!(out, "{}switch (event)", indent(1))?;
        writeln!(out, "{}{{", indent(1))?;
        for event in &user_events {
            writeln!(out, "{}case {}:", indent(1), event)?;
            writeln!(out, "{}return \"{}\";", indent(2), event)?;
        }
        writeln!(out, "{}}}", indent(1))?;
        writeln!(out, "{}return \"Undefined\";", indent(1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        for line in hsm.notes_for(&hsm.name, Stereotype::Test) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
