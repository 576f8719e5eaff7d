use serde_json::Value;
use tracing::{debug, info};

use super::error::Error;
use super::protocol::{self, Command};
use super::{Toolkit, ToolkitInfo};
use crate::model::molecule::{Molecule, MoleculeSource, SourceKind};
use crate::model::property::{Property, PropertyOptions, PropertyValue, ValueKind};
use crate::model::structure::StructureSummary;
use crate::model::types::{MolFileVersion, SvgSize};

/// Transport carrying one request line to the bridge and its reply back.
pub trait Channel {
    fn exchange(&mut self, line: &str) -> Result<String, Error>;
}

/// A [`Toolkit`] backed by the RDKit bridge on the other end of a [`Channel`].
pub struct Session<C: Channel> {
    channel: C,
    next_id: u64,
    info: ToolkitInfo,
}

impl<C: Channel> Session<C> {
    /// Performs the handshake and returns a ready session.
    pub fn open(mut channel: C) -> Result<Self, Error> {
        let line = protocol::encode(0, &Command::Hello)?;
        let reply = channel.exchange(&line)?;
        let value = protocol::decode(&reply, 0)?.map_err(Error::Unavailable)?;
        let info: ToolkitInfo = serde_json::from_value(value)?;

        info!(toolkit = %info.name, version = %info.version, "toolkit session ready");

        Ok(Self {
            channel,
            next_id: 1,
            info,
        })
    }

    fn call(&mut self, command: Command<'_>) -> Result<Result<Value, String>, Error> {
        let id = self.next_id;
        self.next_id += 1;

        let line = protocol::encode(id, &command)?;
        debug!(id, op = command.operation(), "toolkit request");
        let reply = self.channel.exchange(&line)?;
        debug!(id, bytes = reply.len(), "toolkit reply");

        protocol::decode(&reply, id)
    }

    fn call_value(&mut self, command: Command<'_>) -> Result<Value, Error> {
        let operation = command.operation();
        self.call(command)?
            .map_err(|message| Error::Rejected { operation, message })
    }

    fn call_text(&mut self, command: Command<'_>) -> Result<String, Error> {
        let operation = command.operation();
        match self.call_value(command)? {
            Value::String(text) => Ok(text),
            other => Err(Error::Protocol(format!(
                "'{operation}' returned {other} instead of text"
            ))),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_channel(self) -> C {
        self.channel
    }
}

impl<C: Channel> Toolkit for Session<C> {
    fn info(&self) -> &ToolkitInfo {
        &self.info
    }

    fn load(&mut self, source: &MoleculeSource) -> Result<Molecule, Error> {
        let (format, data) = match source {
            MoleculeSource::Smiles(smiles) => ("smiles", smiles.as_str()),
            MoleculeSource::MolFile { text, .. } => ("molfile", text.as_str()),
        };
        let kind = source.kind();

        let value = self
            .call(Command::Load { format, data })?
            .map_err(|message| Error::InvalidInput { kind, message })?;

        let handle = value
            .get("handle")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::Protocol(format!("load returned no handle: {value}")))?;

        debug!(handle, %kind, "molecule loaded");
        Ok(Molecule::from_raw(handle, kind))
    }

    fn property(
        &mut self,
        molecule: &Molecule,
        property: Property,
        options: &PropertyOptions,
    ) -> Result<PropertyValue, Error> {
        let value = self.call_value(Command::Property {
            handle: molecule.id(),
            name: property.key(),
            non_hydrogen_bonds_only: options.non_hydrogen_bonds_only,
        })?;
        property_value(property, value)
    }

    fn smiles(&mut self, molecule: &Molecule) -> Result<String, Error> {
        self.call_text(Command::Smiles {
            handle: molecule.id(),
        })
    }

    fn molfile(&mut self, molecule: &Molecule, version: MolFileVersion) -> Result<String, Error> {
        self.call_text(Command::Molfile {
            handle: molecule.id(),
            version: version.as_str(),
        })
    }

    fn svg(&mut self, molecule: &Molecule, size: SvgSize) -> Result<String, Error> {
        self.call_text(Command::Svg {
            handle: molecule.id(),
            width: size.width(),
            height: size.height(),
        })
    }

    fn summary(&mut self, molecule: &Molecule) -> Result<StructureSummary, Error> {
        let value = self.call_value(Command::Summary {
            handle: molecule.id(),
        })?;
        Ok(serde_json::from_value(value)?)
    }

    fn release(&mut self, molecule: Molecule) -> Result<(), Error> {
        self.call_value(Command::Release {
            handle: molecule.id(),
        })
        .map(|_| ())
    }
}

fn property_value(property: Property, value: Value) -> Result<PropertyValue, Error> {
    let converted = match property.kind() {
        ValueKind::Count => value.as_u64().map(PropertyValue::Count),
        ValueKind::Real => value.as_f64().map(PropertyValue::Real),
        ValueKind::Text => value.as_str().map(|s| PropertyValue::Text(s.to_string())),
    };
    converted.ok_or_else(|| Error::UnexpectedValue {
        property,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Answers requests with a closure, recording every request it saw.
    struct ScriptedChannel<F> {
        respond: F,
        seen: Vec<Value>,
    }

    impl<F> ScriptedChannel<F>
    where
        F: FnMut(&Value) -> Value,
    {
        fn new(respond: F) -> Self {
            Self {
                respond,
                seen: Vec::new(),
            }
        }
    }

    impl<F> Channel for ScriptedChannel<F>
    where
        F: FnMut(&Value) -> Value,
    {
        fn exchange(&mut self, line: &str) -> Result<String, Error> {
            let request: Value = serde_json::from_str(line).expect("request is JSON");
            let reply = (self.respond)(&request);
            self.seen.push(request);
            Ok(reply.to_string())
        }
    }

    fn ok(request: &Value, value: Value) -> Value {
        json!({"id": request["id"], "ok": true, "value": value})
    }

    fn fail(request: &Value, error: &str) -> Value {
        json!({"id": request["id"], "ok": false, "error": error})
    }

    fn ethanol_bridge(request: &Value) -> Value {
        match request["op"].as_str().unwrap() {
            "hello" => ok(request, json!({"toolkit": "RDKit", "version": "2024.03.5"})),
            "load" if request["data"] == "CCO" => ok(request, json!({"handle": 1})),
            "load" => fail(request, "unable to parse smiles input"),
            "property" => match request["name"].as_str().unwrap() {
                "weight" => ok(request, json!(46.069)),
                "donor" => ok(request, json!(1)),
                "formula" => ok(request, json!("C2H6O")),
                "logp" => ok(request, json!("not a number")),
                _ => fail(request, "unknown property"),
            },
            "smiles" => ok(request, json!("CCO")),
            "molfile" => ok(request, json!(format!("ethanol {}", request["version"]))),
            "svg" => ok(request, json!("<svg/>")),
            "summary" => ok(
                request,
                json!({
                    "elements": {"C": 2, "H": 6, "O": 1},
                    "heavy_atoms": 3,
                    "bonds": 2,
                    "rings": 0,
                    "formal_charge": 0,
                    "smiles": "CCO"
                }),
            ),
            "release" => ok(request, Value::Null),
            _ => fail(request, "unknown operation"),
        }
    }

    fn open_ethanol() -> Session<ScriptedChannel<fn(&Value) -> Value>> {
        Session::open(ScriptedChannel::new(ethanol_bridge as fn(&Value) -> Value)).unwrap()
    }

    fn ethanol(session: &mut impl Toolkit) -> Molecule {
        session
            .load(&MoleculeSource::Smiles("CCO".to_string()))
            .unwrap()
    }

    #[test]
    fn handshake_reports_toolkit_version() {
        let session = open_ethanol();
        assert_eq!(session.info().name, "RDKit");
        assert_eq!(session.info().version, "2024.03.5");
    }

    #[test]
    fn handshake_failure_means_unavailable() {
        let channel = ScriptedChannel::new(|req: &Value| {
            fail(req, "RDKit is not importable: No module named 'rdkit'")
        });
        let err = Session::open(channel).err().unwrap();
        assert!(matches!(err, Error::Unavailable(msg) if msg.contains("No module named")));
    }

    #[test]
    fn load_returns_handle_with_source_kind() {
        let mut session = open_ethanol();
        let molecule = ethanol(&mut session);
        assert_eq!(molecule.id(), 1);
        assert_eq!(molecule.source_kind(), SourceKind::Smiles);
    }

    #[test]
    fn unparsable_input_is_invalid_input() {
        let mut session = open_ethanol();
        let err = session
            .load(&MoleculeSource::Smiles("C1CC".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput { kind: SourceKind::Smiles, .. }
        ));
    }

    #[test]
    fn properties_are_typed_by_kind() {
        let mut session = open_ethanol();
        let molecule = ethanol(&mut session);
        let options = PropertyOptions::default();

        assert_eq!(
            session.property(&molecule, Property::Weight, &options).unwrap(),
            PropertyValue::Real(46.069)
        );
        assert_eq!(
            session.property(&molecule, Property::Donor, &options).unwrap(),
            PropertyValue::Count(1)
        );
        assert_eq!(
            session.property(&molecule, Property::Formula, &options).unwrap(),
            PropertyValue::Text("C2H6O".into())
        );
    }

    #[test]
    fn wrongly_typed_property_is_reported() {
        let mut session = open_ethanol();
        let molecule = ethanol(&mut session);
        let err = session
            .property(&molecule, Property::LogP, &PropertyOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedValue { property: Property::LogP, .. }
        ));
    }

    #[test]
    fn rejected_operation_names_the_operation() {
        let mut session = open_ethanol();
        let molecule = ethanol(&mut session);
        let err = session
            .property(&molecule, Property::Bonds, &PropertyOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Rejected { operation: "property", .. }));
    }

    #[test]
    fn hydrogen_filter_is_forwarded() {
        let mut session = Session::open(ScriptedChannel::new(|req: &Value| {
            match req["op"].as_str().unwrap() {
                "hello" => ok(req, json!({"toolkit": "RDKit", "version": "x"})),
                "load" => ok(req, json!({"handle": 9})),
                _ => ok(req, json!(1.4)),
            }
        }))
        .unwrap();
        let molecule = ethanol(&mut session);
        let options = PropertyOptions {
            non_hydrogen_bonds_only: true,
        };
        session
            .property(&molecule, Property::AverageBondLength, &options)
            .unwrap();

        let channel = session.into_channel();
        let last = channel.seen.last().unwrap();
        assert_eq!(last["handle"], 9);
        assert_eq!(last["name"], "average_bond_length");
        assert_eq!(last["non_hydrogen_bonds_only"], true);
    }

    #[test]
    fn exports_and_summary_round_trip() {
        let mut session = open_ethanol();
        let molecule = ethanol(&mut session);

        assert_eq!(session.smiles(&molecule).unwrap(), "CCO");
        assert_eq!(
            session.molfile(&molecule, MolFileVersion::V3000).unwrap(),
            "ethanol \"V3000\""
        );
        assert_eq!(
            session.svg(&molecule, SvgSize::default()).unwrap(),
            "<svg/>"
        );

        let summary = session.summary(&molecule).unwrap();
        assert_eq!(summary.atom_count(), 9);
        assert_eq!(summary.smiles, "CCO");

        session.release(molecule).unwrap();
    }

    #[test]
    fn request_ids_increase() {
        let mut session = open_ethanol();
        let molecule = ethanol(&mut session);
        session.smiles(&molecule).unwrap();

        let ids: Vec<u64> = session
            .into_channel()
            .seen
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn stale_reply_is_a_protocol_error() {
        let mut session = Session::open(ScriptedChannel::new(|req: &Value| {
            if req["op"] == "hello" {
                ok(req, json!({"toolkit": "RDKit", "version": "x"}))
            } else {
                json!({"id": 99, "ok": true, "value": {"handle": 1}})
            }
        }))
        .unwrap();
        let err = session
            .load(&MoleculeSource::Smiles("CCO".into()))
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }
}
