//! End-to-end tests for the analysis → scheduling → allocation pipeline
//!
//! All audio is generated synthetically; the engine never reads files.

use beatcut::{
    analyze_audio, generate_timeline, Algorithm, CropMode, MediaItem, SyncSettings, VideoMode,
};

/// Generate a 4-on-floor kick pattern at the given BPM
fn kick_pattern(duration_seconds: f32, bpm: f32, sample_rate: f32) -> Vec<f32> {
    let num_samples = (duration_seconds * sample_rate) as usize;
    let mut samples = vec![0.0f32; num_samples];

    let beat_interval = (60.0 / bpm * sample_rate) as usize;
    let kick_samples = (0.08 * sample_rate) as usize;

    let mut pos = 0;
    while pos < num_samples {
        let end = (pos + kick_samples).min(num_samples);
        for (i, sample) in samples[pos..end].iter_mut().enumerate() {
            let t = i as f32 / kick_samples as f32;
            *sample = (-t * 5.0).exp() * 0.8;
        }
        pos += beat_interval;
    }

    samples
}

fn media_pool() -> Vec<MediaItem> {
    vec![
        MediaItem::video(1, "intro.mp4", 45.0),
        MediaItem::video(2, "broll.mp4", 60.0),
        MediaItem::image(3, "title.png"),
        MediaItem::video(4, "outro.mp4", 30.0),
    ]
}

#[test]
fn test_full_pipeline_kick_track() {
    let samples = kick_pattern(16.0, 120.0, 44100.0);
    let settings = SyncSettings::default();

    let analysis = analyze_audio(&samples, 44100, &settings).expect("Analysis should succeed");

    assert!(
        analysis.beats.len() >= 20,
        "16s of 120 BPM kicks should produce a dense beat list, got {}",
        analysis.beats.len()
    );
    assert!(
        (analysis.bpm - 120.0).abs() <= 5.0,
        "Expected ~120 BPM, got {:.1}",
        analysis.bpm
    );

    let timeline = generate_timeline(&media_pool(), &analysis, &settings);
    assert!(!timeline.is_empty());

    // Contiguity and coverage
    assert_eq!(timeline[0].timeline_start, 0.0);
    for pair in timeline.windows(2) {
        assert_eq!(pair[0].timeline_end, pair[1].timeline_start);
    }
    let last = timeline.last().unwrap();
    assert!(
        (last.timeline_end - analysis.duration_seconds).abs() < 1e-3,
        "Timeline must cover the whole track"
    );

    // Duration identity on every clip
    for clip in &timeline {
        let timeline_len = clip.timeline_end - clip.timeline_start;
        let source_len = clip.source_end - clip.source_start;
        assert!(timeline_len > 0.0);
        assert!((timeline_len - source_len).abs() < 1e-4);
    }
}

#[test]
fn test_silent_track_produces_no_beats_but_metronome_still_cuts() {
    let samples = vec![0.0f32; 44100 * 8];
    let settings = SyncSettings {
        video_mode: VideoMode::Metronome,
        ..SyncSettings::default()
    };

    let analysis = analyze_audio(&samples, 44100, &settings).unwrap();
    assert!(analysis.beats.is_empty(), "Silence has no onsets");
    assert_eq!(analysis.bpm, 0.0);

    // The metronome grid falls back to 120 BPM and still spans the track
    let timeline = generate_timeline(&media_pool(), &analysis, &settings);
    assert!(!timeline.is_empty());
    assert!(
        (timeline.last().unwrap().timeline_end - 8.0).abs() < 1e-3,
        "Grid must span the silent track"
    );
}

#[test]
fn test_every_algorithm_end_to_end() {
    let samples = kick_pattern(10.0, 128.0, 44100.0);

    for algorithm in [
        Algorithm::Drums,
        Algorithm::Bass,
        Algorithm::Guitar,
        Algorithm::Vocals,
        Algorithm::Voice,
        Algorithm::Words,
        Algorithm::Sentences,
        Algorithm::Melody,
        Algorithm::Brass,
        Algorithm::Keys,
        Algorithm::Energy,
        Algorithm::Spectral,
        Algorithm::Silence,
        Algorithm::Downbeats,
        Algorithm::Phrases,
        Algorithm::Intensity,
        Algorithm::Harmonic,
    ] {
        let settings = SyncSettings {
            algorithm,
            ..SyncSettings::default()
        };
        let analysis = analyze_audio(&samples, 44100, &settings)
            .unwrap_or_else(|e| panic!("{:?} analysis failed: {}", algorithm, e));

        for pair in analysis.beats.windows(2) {
            assert!(
                pair[1] > pair[0],
                "{:?}: timestamps must strictly increase",
                algorithm
            );
        }
        for &t in &analysis.beats {
            assert!(
                t >= 0.0 && t <= analysis.duration_seconds,
                "{:?}: timestamp {:.3} outside the track",
                algorithm,
                t
            );
        }

        // Every algorithm's output must feed the scheduler without panics
        let timeline = generate_timeline(&media_pool(), &analysis, &settings);
        assert!(
            !timeline.is_empty(),
            "{:?}: scheduling produced no clips",
            algorithm
        );
    }
}

#[test]
fn test_reanalysis_supersedes_by_fingerprint() {
    let samples = kick_pattern(6.0, 120.0, 44100.0);

    let drums = SyncSettings::default();
    let result = analyze_audio(&samples, 44100, &drums).unwrap();
    assert!(result.is_fresh(&drums.fingerprint()));

    // A settings change invalidates the old result without any call into
    // the engine; the caller just recomputes
    let phrases = SyncSettings {
        algorithm: Algorithm::Phrases,
        ..SyncSettings::default()
    };
    assert!(!result.is_fresh(&phrases.fingerprint()));

    let superseded = analyze_audio(&samples, 44100, &phrases).unwrap();
    assert!(superseded.is_fresh(&phrases.fingerprint()));
}

#[test]
fn test_smart_crop_never_reuses_footage_before_saturation() {
    let samples = kick_pattern(6.0, 120.0, 44100.0);
    let settings = SyncSettings {
        crop_mode: CropMode::Smart,
        skip_every_n: 4,
        ..SyncSettings::default()
    };

    let analysis = analyze_audio(&samples, 44100, &settings).unwrap();
    let media = vec![MediaItem::video(9, "only.mp4", 90.0)];
    let timeline = generate_timeline(&media, &analysis, &settings);

    // One roomy item: every source range must be disjoint
    for i in 0..timeline.len() {
        for j in (i + 1)..timeline.len() {
            let a = (timeline[i].source_start, timeline[i].source_end);
            let b = (timeline[j].source_start, timeline[j].source_end);
            assert!(
                a.0 >= b.1 || b.0 >= a.1,
                "Clips {} and {} share footage: {:?} vs {:?}",
                i,
                j,
                a,
                b
            );
        }
    }
}

#[test]
fn test_seeded_runs_are_reproducible_end_to_end() {
    let samples = kick_pattern(12.0, 100.0, 44100.0);
    let settings = SyncSettings {
        video_mode: VideoMode::RandomLoop,
        algorithm: Algorithm::Energy,
        crop_mode: CropMode::Random,
        duration_variance: 30,
        seed: 2024,
        ..SyncSettings::default()
    };

    let analysis = analyze_audio(&samples, 44100, &settings).unwrap();
    let first = generate_timeline(&media_pool(), &analysis, &settings);
    let second = generate_timeline(&media_pool(), &analysis, &settings);

    assert_eq!(first, second, "Identical settings and seed, identical cut list");
}

#[test]
fn test_empty_inputs_short_circuit() {
    let samples = kick_pattern(4.0, 120.0, 44100.0);
    let settings = SyncSettings::default();
    let analysis = analyze_audio(&samples, 44100, &settings).unwrap();

    assert!(generate_timeline(&[], &analysis, &settings).is_empty());

    let no_audio = analyze_audio(&[], 44100, &settings).unwrap();
    assert!(generate_timeline(&media_pool(), &no_audio, &settings).is_empty());
}
