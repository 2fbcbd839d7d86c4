use pitch_analysis::detector::PitchDetector;
use pitch_analysis::detector::{autocorrelation::AutocorrelationDetector, yin::YINDetector};
use pitch_analysis::float::{cast, Float};
use pitch_analysis::utils::buffer::new_real_buffer;
use pitch_analysis::utils::frames::frame_count;
use pitch_analysis::utils::window::hann;
use pitch_analysis::{
    AggregateResult, AnalysisProfile, Analyzer, ChannelProgress, DecodedAudio, NotePolicy,
    SampleBuffer,
};

#[test]
fn autocorrelation_sin_signal() {
    pure_frequency(String::from("Autocorrelation"), String::from("sin"), 220.0);
    pure_frequency(String::from("Autocorrelation"), String::from("sin"), 440.0);
}

#[test]
fn yin_sin_signal() {
    pure_frequency(String::from("YIN"), String::from("sin"), 220.0);
    pure_frequency(String::from("YIN"), String::from("sin"), 440.0);
    pure_frequency(String::from("YIN"), String::from("sin"), 1000.0);
}

#[test]
fn autocorrelation_square_signal() {
    pure_frequency(
        String::from("Autocorrelation"),
        String::from("square"),
        300.0,
    );
}

#[test]
fn yin_square_signal() {
    pure_frequency(String::from("YIN"), String::from("square"), 220.0);
    pure_frequency(String::from("YIN"), String::from("square"), 440.0);
}

#[test]
fn autocorrelation_triangle_signal() {
    pure_frequency(
        String::from("Autocorrelation"),
        String::from("triangle"),
        440.0,
    );
}

#[test]
fn yin_triangle_signal() {
    pure_frequency(String::from("YIN"), String::from("triangle"), 300.0);
}

#[test]
fn detectors_reject_silence() {
    const WINDOW: usize = 2048;
    let silence = new_real_buffer::<f64>(WINDOW);
    for name in ["Autocorrelation", "YIN"] {
        let mut detector = detector_factory(name.into(), WINDOW);
        assert!(detector.get_pitch(&silence, 44100).is_none(), "{}", name);
    }
}

#[test]
fn file_analysis_of_a3() {
    init_logger();
    let buffer = mono_buffer(sin_wave(220.0, 44100 * 3, 44100), 44100);

    let result = Analyzer::new(AnalysisProfile::file()).analyze(&buffer);

    assert!((result.frequency - 220.0).abs() <= 2.0, "{:?}", result);
    assert_eq!(result.note, "A");
}

#[test]
fn live_analysis_of_a3() {
    init_logger();
    let buffer = mono_buffer(sin_wave(220.0, 44100, 44100), 44100);

    let result = Analyzer::new(AnalysisProfile::live()).analyze(&buffer);

    assert!((result.frequency - 220.0).abs() <= 2.2, "{:?}", result);
    assert_eq!(result.note, "A");
}

#[test]
fn quick_analysis_skips_the_count_in() {
    init_logger();
    // Two seconds of E4 count-in, then G4.
    let mut samples = sin_wave::<f32>(329.63, 44100 * 2, 44100);
    samples.extend(sin_wave::<f32>(392.0, 44100, 44100));
    let buffer = mono_buffer(samples, 44100);

    let result = Analyzer::new(AnalysisProfile::quick()).analyze(&buffer);

    assert!((result.frequency - 392.0).abs() < 4.0, "{:?}", result);
    assert_eq!(result.note, "G");
}

#[test]
fn silent_buffer_has_no_pitch() {
    let buffer = mono_buffer(vec![0.0; 44100 * 2], 44100);
    for profile in [
        AnalysisProfile::file(),
        AnalysisProfile::live(),
        AnalysisProfile::quick(),
    ] {
        let result = Analyzer::new(profile).analyze(&buffer);
        assert_eq!(result.frequency, 0.0);
        assert!(!result.is_pitched());
    }
}

#[test]
fn analysis_is_repeatable() {
    let buffer = mono_buffer(square_wave(300.0, 44100 * 2, 44100), 44100);
    let analyzer = Analyzer::new(AnalysisProfile::file());
    assert_eq!(analyzer.analyze(&buffer), analyzer.analyze(&buffer));
}

#[test]
fn frame_counts() {
    assert_eq!(frame_count(2048, 2048, 4096, None), 1);
    assert_eq!(frame_count(2047, 2048, 4096, None), 0);
    assert_eq!(frame_count(44100 * 15, 2048, 4096, None), 161);
    assert_eq!(frame_count(44100, 2048, 1024, None), 42);
    assert_eq!(frame_count(44100, 2048, 1024, Some(10)), 10);

    let buffer = mono_buffer(vec![0.0; 10_000], 8000);
    for (frame_size, hop_size) in [(2048, 4096), (2048, 1024), (1000, 1000), (16, 3)] {
        let frames: Vec<_> = buffer.frames(frame_size, hop_size, None).collect();
        assert_eq!(
            frames.len(),
            frame_count(buffer.len(), frame_size, hop_size, None)
        );
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.offset, i * hop_size);
            assert_eq!(frame.samples.len(), frame_size);
        }
    }
}

#[test]
fn stereo_is_downmixed_before_analysis() {
    init_logger();
    // Left carries the tone, right is silent: the mix is the tone at half volume.
    let tone = sin_wave::<f32>(220.0, 44100 * 2, 44100);
    let interleaved: Vec<f32> = tone.iter().flat_map(|&s| [s, 0.0]).collect();
    let decoded = DecodedAudio::Interleaved {
        samples: &interleaved,
        channels: 2,
        sample_rate: 44100,
    };

    let mut progress = Vec::new();
    let result = Analyzer::new(AnalysisProfile::file())
        .analyze_decoded(&decoded, &mut |p: u8| progress.push(p));

    assert!((result.frequency - 220.0).abs() <= 2.0, "{:?}", result);
    assert_eq!(result.note, "A");
    assert_eq!(progress.last(), Some(&100));
}

#[test]
fn unreadable_input_reports_error() {
    let decoded = DecodedAudio::Interleaved {
        samples: &[],
        channels: 0,
        sample_rate: 44100,
    };
    let result = Analyzer::default().analyze_decoded(&decoded, &mut pitch_analysis::NoProgress);
    assert_eq!(result, AggregateResult::error());
    assert_eq!(result.frequency, 0.0);
}

#[test]
fn progress_is_monotonic_and_complete() {
    let buffer = mono_buffer(sin_wave(440.0, 44100 * 20, 44100), 44100);
    let mut progress = Vec::new();
    Analyzer::new(AnalysisProfile {
        max_estimates: None,
        ..AnalysisProfile::file()
    })
    .analyze_with_progress(&buffer, &mut |p: u8| progress.push(p));

    assert!(progress.len() > 2);
    assert_eq!(progress.first(), Some(&0));
    assert_eq!(progress.last(), Some(&100));
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn progress_crosses_threads() {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let handle = std::thread::spawn(move || {
        let buffer = mono_buffer(sin_wave(330.0, 44100 * 3, 44100), 44100);
        let mut progress = ChannelProgress::new(sender);
        Analyzer::new(AnalysisProfile::file()).analyze_with_progress(&buffer, &mut progress)
    });

    let received: Vec<u8> = receiver.iter().collect();
    let result = handle.join().unwrap();

    assert_eq!(result.note, "E");
    assert_eq!(received.last(), Some(&100));
    assert!(received.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn nearest_table_snaps_to_one_octave() {
    let buffer = mono_buffer(sin_wave(220.0, 44100 * 3, 44100), 44100);
    let result = Analyzer::new(AnalysisProfile {
        note_policy: NotePolicy::NearestTable,
        ..AnalysisProfile::file()
    })
    .analyze(&buffer);
    // 220 Hz is below the table; its closest entry is C4.
    assert_eq!(result.note, "C");
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mono_buffer(samples: Vec<f32>, sample_rate: u32) -> SampleBuffer {
    SampleBuffer::new(samples, sample_rate).unwrap()
}

fn sin_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let two_pi = 2.0 * std::f64::consts::PI;
    let dx = two_pi * freq / sample_rate as f64;
    for i in 0..size {
        let x = i as f64 * dx;
        let y = 0.5 * x.sin();
        signal[i] = cast(y);
    }
    signal
}

fn square_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac >= 0.5 {
            true => -1.0,
            false => 1.0,
        };
        signal[i] = cast(y);
    }
    signal
}

fn triangle_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for i in 0..size {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac {
            f if f < 0.25 => 4. * f,
            f if f < 0.75 => 1. - 4. * (f - 0.25),
            f => -1. + 4. * (f - 0.75),
        };
        signal[i] = cast(y);
    }
    signal
}

fn detector_factory(name: String, window: usize) -> Box<dyn PitchDetector<f64>> {
    match name.as_ref() {
        "Autocorrelation" => Box::new(AutocorrelationDetector::<f64>::new(window)),
        "YIN" => Box::new(YINDetector::<f64>::new(window)),
        _ => panic!("Unknown detector {}", name),
    }
}

fn signal_factory<T: Float>(name: String, freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    match name.as_ref() {
        "sin" => sin_wave(freq, size, sample_rate),
        "square" => square_wave(freq, size, sample_rate),
        "triangle" => triangle_wave(freq, size, sample_rate),
        _ => panic!("Unknown wave function {}", name),
    }
}

/// Every frame of a stationary wave must be within 1% of `freq_in`.
/// Autocorrelation frames are Hann windowed, as the live profile does.
fn pure_frequency(detector_name: String, wave_name: String, freq_in: f64) {
    const WINDOW: usize = 2048;
    const DELTA_T: usize = 1013;
    const N_WINDOWS: usize = 8;

    for sample_rate in [44100, 48000] {
        let size = WINDOW + DELTA_T * N_WINDOWS;
        let signal = signal_factory::<f64>(wave_name.clone(), freq_in, size, sample_rate);
        let windowed = detector_name == "Autocorrelation";
        let mut detector = detector_factory(detector_name.clone(), WINDOW);

        for i in 0..N_WINDOWS {
            let t = i * DELTA_T;
            let chunk = &signal[t..t + WINDOW];
            let pitch = match windowed {
                true => detector.get_pitch(&hann(chunk), sample_rate),
                false => detector.get_pitch(chunk, sample_rate),
            };

            match pitch {
                Some(pitch) => {
                    println!(
                        "{} {} @ {}: freq {}; clarity {}",
                        detector_name, wave_name, sample_rate, pitch.frequency, pitch.clarity
                    );
                    assert!(
                        (pitch.frequency - freq_in).abs() < 0.01 * freq_in,
                        "{} Hz detected for {} Hz",
                        pitch.frequency,
                        freq_in
                    );
                }
                None => panic!("No pitch for {} {} Hz", wave_name, freq_in),
            }
        }
    }
}
