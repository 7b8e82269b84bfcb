use std::io::{Read, Write};
use log::{debug, error};
use rmodbus::{client::ModbusRequest, guess_response_frame_len, ModbusProto};

use crate::{config::ModbusProtoConfig, meters::{operation::{FuncCode, Operation}, MeterError, Result}, transport::Transport};

pub fn modbus_proto(proto: ModbusProtoConfig) -> ModbusProto {
    /* RTU over TCP still needs the CRC */
    match proto {
        ModbusProtoConfig::TCP => ModbusProto::TcpUdp,
        ModbusProtoConfig::RTU | ModbusProtoConfig::RTUoverTCP => ModbusProto::Rtu,
    }
}

/// An encoded request together with the state needed to check its answer.
pub struct RequestFrame {
    request: ModbusRequest,
    address: u16,
    pub bytes: Vec<u8>,
}

impl RequestFrame {
    pub fn new(unit_id: u8, proto: ModbusProtoConfig, op: &Operation) -> Result<Self> {
        let mut request = ModbusRequest::new(unit_id, modbus_proto(proto));
        let mut bytes = Vec::new();

        match op.func_code {
            FuncCode::ReadHoldingRegisters => {
                request
                    .generate_get_holdings(op.address, op.read_len, &mut bytes)
                    .map_err(|e| MeterError::Frame(format!("{e:?}")))?;
            }
        }

        debug!("Request for unit {} register 0x{:04X}: {}", unit_id, op.address, hex::encode(&bytes));
        return Ok(RequestFrame { request, address: op.address, bytes });
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Extracts the register payload from a response frame as big endian bytes,
    /// ready for the operation's decode.
    pub fn parse_response(&self, response: &[u8]) -> Result<Vec<u8>> {
        let mut data: Vec<u16> = Vec::new();
        if let Err(e) = self.request.parse_u16(response, &mut data) {
            error!("Error getting response for register 0x{:04X}: {:?}", self.address, e);
            return Err(MeterError::Frame(format!("{e:?}")));
        }

        let mut bytes = Vec::with_capacity(data.len() * 2);
        for word in data {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        Ok(bytes)
    }
}

/// Runs operations over a byte stream, a TCP socket or a serial port.
///
/// One request is in flight at a time, the caller owns the bus.
pub struct StreamTransport<S: Read + Write> {
    stream: S,
    proto: ModbusProtoConfig,
}

impl<S: Read + Write> StreamTransport<S> {
    pub fn new(stream: S, proto: ModbusProtoConfig) -> Self {
        StreamTransport { stream, proto }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn read(&mut self, unit_id: u8, op: &Operation) -> Result<Vec<u8>> {
        let frame = RequestFrame::new(unit_id, self.proto, op)?;
        self.stream.write_all(&frame.bytes)?;
        self.stream.flush()?;

        /* enough of the header to know the full frame length */
        let proto = modbus_proto(self.proto);
        let header_len = match proto {
            ModbusProto::TcpUdp => 6,
            _ => 3,
        };
        let mut response = vec![0u8; header_len];
        self.stream.read_exact(&mut response)?;

        let len = guess_response_frame_len(&response, proto)
            .map_err(|e| MeterError::Frame(format!("{e:?}")))? as usize;
        if len > header_len {
            let mut rest = vec![0u8; len - header_len];
            self.stream.read_exact(&mut rest)?;
            response.extend_from_slice(&rest);
        }

        debug!("Response for unit {} register 0x{:04X}: {}", unit_id, op.address, hex::encode(&response));
        frame.parse_response(&response)
    }
}
