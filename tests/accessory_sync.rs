// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch and event ingestion through a running accessory.

mod common;

use std::sync::Arc;

use parking_lot::Mutex;

use common::{FakeTransport, settle};
use fanlink::accessory::{AccessoryConfig, FanAccessory};
use fanlink::protocol::{DpId, DpMap, DpWrite};
use fanlink::state::FanState;
use fanlink::{
    Capability, CapabilityUpdate, CapabilityValue, ColorTemperature, Error, Percent,
    RotationDirection, Subscribable, TogglePolicy,
};

fn collect_updates(fan: &FanAccessory) -> Arc<Mutex<Vec<CapabilityUpdate>>> {
    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    fan.on_capability_changed(move |update| sink.lock().push(*update));
    updates
}

async fn connected_fan(config: &AccessoryConfig) -> (Arc<FakeTransport>, FanAccessory) {
    let transport = FakeTransport::new();
    let fan = FanAccessory::spawn(config, Arc::clone(&transport)).unwrap();
    settle().await;
    assert!(fan.connection_status().is_connected());
    (transport, fan)
}

mod commands {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn speed_round_trip_keeps_dial_position() {
        let (transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;
        let updates = collect_updates(&fan);

        fan.set_fan_speed(Percent::new(70).unwrap()).await.unwrap();
        assert_eq!(
            fan.get(Capability::FanSpeed).unwrap(),
            CapabilityValue::Percent(Percent::new(70).unwrap())
        );

        settle().await;
        assert_eq!(transport.writes(), vec![DpWrite::new(DpId::FAN_SPEED, 5_i64)]);

        transport
            .report(DpMap::new().with(DpId::FAN_SPEED, 5_i64))
            .await;
        settle().await;

        assert_eq!(fan.state().fan_speed(), Percent::new(70).unwrap());
        assert_eq!(
            *updates.lock(),
            vec![CapabilityUpdate::new(
                Capability::FanSpeed,
                Percent::new(70).unwrap()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_speed_turns_fan_off_and_keeps_speed() {
        let (transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;

        fan.set_fan_power(true).await.unwrap();
        fan.set_fan_speed(Percent::MIN).await.unwrap();
        settle().await;

        let state = fan.state();
        assert!(!state.fan_power());
        assert_eq!(state.fan_speed(), Percent::new(20).unwrap());
        assert_eq!(
            transport.writes(),
            vec![
                DpWrite::new(DpId::FAN_POWER, true),
                DpWrite::new(DpId::FAN_POWER, false),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn light_commands_are_encoded() {
        let config = AccessoryConfig::new("bf01", "key")
            .with_light(true)
            .with_color_temperature(true);
        let (transport, fan) = connected_fan(&config).await;

        fan.set_light_power(true).await.unwrap();
        fan.set_light_brightness(Percent::new(45).unwrap())
            .await
            .unwrap();
        fan.set_light_color_temperature(ColorTemperature::WARM)
            .await
            .unwrap();
        fan.set_fan_rotation(RotationDirection::Reverse)
            .await
            .unwrap();
        settle().await;

        assert_eq!(
            transport.writes(),
            vec![
                DpWrite::new(DpId::LIGHT_POWER, true),
                DpWrite::new(DpId::LIGHT_BRIGHTNESS, 450_i64),
                DpWrite::new(DpId::LIGHT_COLOR_TEMPERATURE, 1000_i64),
                DpWrite::new(DpId::FAN_ROTATION, "reverse"),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_brightness_turns_light_off() {
        let config = AccessoryConfig::new("bf01", "key").with_light(true);
        let (transport, fan) = connected_fan(&config).await;

        fan.set_light_power(true).await.unwrap();
        fan.set_light_brightness(Percent::MIN).await.unwrap();
        settle().await;

        assert!(!fan.state().light_power());
        assert_eq!(fan.state().light_brightness(), Percent::new(60).unwrap());
        assert_eq!(
            transport.writes().last(),
            Some(&DpWrite::new(DpId::LIGHT_POWER, false))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_press_while_on_turns_off() {
        let config = AccessoryConfig::new("bf01", "key").with_toggle(true);
        let (transport, fan) = connected_fan(&config).await;

        transport
            .report(DpMap::new().with(DpId::FAN_POWER, true))
            .await;
        settle().await;
        let updates = collect_updates(&fan);

        fan.set(Capability::FanToggle, true).await.unwrap();
        settle().await;

        assert!(!fan.state().fan_power());
        assert_eq!(
            transport.writes(),
            vec![DpWrite::new(DpId::FAN_POWER, false)]
        );
        assert_eq!(
            *updates.lock(),
            vec![
                CapabilityUpdate::new(Capability::FanPower, false),
                CapabilityUpdate::new(Capability::FanToggle, false),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn flip_policy_flips_on_any_press() {
        let config = AccessoryConfig::new("bf01", "key")
            .with_toggle(true)
            .with_toggle_policy(TogglePolicy::Flip);
        let (_transport, fan) = connected_fan(&config).await;

        fan.set(Capability::FanToggle, false).await.unwrap();
        assert!(fan.state().fan_power());
        fan.set(Capability::FanToggle, false).await.unwrap();
        assert!(!fan.state().fan_power());
    }

    #[tokio::test(start_paused = true)]
    async fn write_while_disconnected_is_dropped() {
        let transport = FakeTransport::failing(1);
        let fan = FanAccessory::spawn(&AccessoryConfig::new("bf01", "key"), Arc::clone(&transport))
            .unwrap();
        settle().await;
        assert!(!fan.connection_status().is_connected());

        fan.set_fan_power(true).await.unwrap();
        settle().await;

        assert!(fan.state().fan_power());
        assert!(transport.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn undeclared_capability_is_rejected() {
        let (_transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;

        assert!(matches!(
            fan.get(Capability::LightPower),
            Err(Error::CapabilityNotSupported(Capability::LightPower))
        ));
        assert!(matches!(
            fan.set_light_power(true).await,
            Err(Error::CapabilityNotSupported(Capability::LightPower))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_value_kind_is_rejected() {
        let (_transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;

        let result = fan.set(Capability::FanSpeed, true).await;
        assert!(matches!(result, Err(Error::Value(_))));
        assert_eq!(fan.state(), FanState::new());
    }

    #[tokio::test(start_paused = true)]
    async fn set_after_shutdown_fails() {
        let (_transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;

        fan.shutdown().await;
        fan.shutdown().await;

        assert!(matches!(
            fan.set_fan_power(true).await,
            Err(Error::AccessoryStopped)
        ));
        assert!(!fan.connection_status().is_connected());
    }
}

mod reports {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn partial_report_changes_only_fan_power() {
        let config = AccessoryConfig::new("bf01", "key").with_light(true);
        let (transport, fan) = connected_fan(&config).await;

        transport
            .report(DpMap::new().with(DpId::FAN_POWER, true))
            .await;
        settle().await;

        let mut expected = FanState::new();
        expected.apply(&fanlink::state::StateChange::FanPower(true));
        assert_eq!(fan.state(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn full_report_updates_everything() {
        let config = AccessoryConfig::new("bf01", "key")
            .with_light(true)
            .with_color_temperature(true);
        let (transport, fan) = connected_fan(&config).await;

        let dps = DpMap::from_json(
            r#"{"20": true, "22": 300, "23": 500, "60": true, "62": 6, "63": "reverse"}"#,
        )
        .unwrap();
        transport.report(dps).await;
        settle().await;

        let state = fan.state();
        assert!(state.light_power());
        assert_eq!(state.light_brightness(), Percent::new(30).unwrap());
        assert_eq!(state.light_color_temperature(), ColorTemperature::NEUTRAL);
        assert!(state.fan_power());
        assert_eq!(state.fan_speed(), Percent::MAX);
        assert_eq!(state.fan_rotation(), RotationDirection::Reverse);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_value_does_not_block_other_keys() {
        let config = AccessoryConfig::new("bf01", "key").with_light(true);
        let (transport, fan) = connected_fan(&config).await;

        let dps = DpMap::from_json(r#"{"22": "bright", "60": true}"#).unwrap();
        transport.report(dps).await;
        settle().await;

        assert!(fan.state().fan_power());
        assert_eq!(fan.state().light_brightness(), Percent::new(60).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_report_notifies_again() {
        let (transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;
        let updates = collect_updates(&fan);

        for _ in 0..2 {
            transport
                .report(DpMap::new().with(DpId::FAN_ROTATION, "forward"))
                .await;
        }
        settle().await;

        assert_eq!(updates.lock().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn light_report_ignored_without_light() {
        let (transport, fan) = connected_fan(&AccessoryConfig::new("bf01", "key")).await;
        let updates = collect_updates(&fan);

        transport
            .report(DpMap::new().with(DpId::LIGHT_POWER, true))
            .await;
        settle().await;

        assert!(updates.lock().is_empty());
        assert!(!fan.state().light_power());
    }
}
